//! # Tree visitor
//!
//! Generic depth-first traversal over the syntax tree, separated from any
//! analysis logic in the style used by ruff: a [`Visitor`] trait whose
//! methods default to the corresponding `walk_*` function, so an analysis
//! overrides only the node kinds it cares about and calls `walk_*` to keep
//! descending.
//!
//! Traversal order is source order: pre-order on entry, with children
//! visited left to right. `Unknown` nodes have no children and are skipped.

use crate::ast::{Expr, Located, Program, Stmt};

/// Core visitor trait for tree traversal.
pub trait Visitor {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_stmt(&mut self, stmt: &Located<Stmt>) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Located<Expr>) {
        walk_expr(self, expr);
    }

    fn visit_body(&mut self, body: &[Located<Stmt>]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }
}

pub fn walk_program<V: Visitor + ?Sized>(visitor: &mut V, program: &Program) {
    visitor.visit_body(&program.statements);
}

/// Walk a statement, visiting child expressions and statements in source order.
pub fn walk_stmt<V: Visitor + ?Sized>(visitor: &mut V, stmt: &Located<Stmt>) {
    match stmt.value() {
        Stmt::Expr { expr } => visitor.visit_expr(expr),
        Stmt::Echo { exprs } => {
            for expr in exprs {
                visitor.visit_expr(expr);
            }
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_body(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_body(else_branch);
            }
        }
        Stmt::Foreach { iterable, body, .. } => {
            visitor.visit_expr(iterable);
            visitor.visit_body(body);
        }
        Stmt::For {
            init,
            condition,
            step,
            body,
        } => {
            for expr in init {
                visitor.visit_expr(expr);
            }
            for expr in condition {
                visitor.visit_expr(expr);
            }
            visitor.visit_body(body);
            for expr in step {
                visitor.visit_expr(expr);
            }
        }
        Stmt::While { condition, body } => {
            visitor.visit_expr(condition);
            visitor.visit_body(body);
        }
        Stmt::DoWhile { body, condition } => {
            visitor.visit_body(body);
            visitor.visit_expr(condition);
        }
        Stmt::Return { value } => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::Function { body, .. } => visitor.visit_body(body),
        Stmt::Class { body, .. } => visitor.visit_body(body),
        Stmt::Block { body } => visitor.visit_body(body),
        Stmt::Unknown => {}
    }
}

/// Walk an expression, visiting child nodes in source order.
pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, expr: &Located<Expr>) {
    match expr.value() {
        Expr::Variable { .. }
        | Expr::StringLit { .. }
        | Expr::IntLit { .. }
        | Expr::BoolLit { .. }
        | Expr::Null
        | Expr::Unknown => {}
        Expr::Array { items } => {
            for item in items {
                if let Some(key) = &item.key {
                    visitor.visit_expr(key);
                }
                visitor.visit_expr(&item.value);
            }
        }
        Expr::Index { target, index } => {
            visitor.visit_expr(target);
            visitor.visit_expr(index);
        }
        Expr::PropertyFetch { target, .. } => visitor.visit_expr(target),
        Expr::MethodCall { target, args, .. } => {
            visitor.visit_expr(target);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::StaticCall { args, .. } | Expr::FunctionCall { args, .. } => {
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Assign { target, value } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        Expr::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::Unary { operand, .. } => visitor.visit_expr(operand),
        Expr::Ternary {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(condition);
            if let Some(then_branch) = then_branch {
                visitor.visit_expr(then_branch);
            }
            visitor.visit_expr(else_branch);
        }
        Expr::Closure { body, .. } => visitor.visit_body(body),
        Expr::ArrowFn { body, .. } => visitor.visit_expr(body),
    }
}

#[cfg(test)]
mod tests {
    use smol_str::SmolStr;

    use super::*;
    use crate::ast::Expr;

    /// Counts visited nodes and collects variable names in visit order.
    #[derive(Default)]
    struct Recorder {
        stmts: usize,
        exprs: usize,
        variables: Vec<SmolStr>,
    }

    impl Visitor for Recorder {
        fn visit_stmt(&mut self, stmt: &Located<Stmt>) {
            self.stmts += 1;
            walk_stmt(self, stmt);
        }

        fn visit_expr(&mut self, expr: &Located<Expr>) {
            self.exprs += 1;
            if let Expr::Variable { name } = expr.value() {
                self.variables.push(name.clone());
            }
            walk_expr(self, expr);
        }
    }

    fn var(name: &str, line: u32) -> Located<Expr> {
        Located::new(
            Expr::Variable {
                name: SmolStr::new(name),
            },
            line,
        )
    }

    #[test]
    fn walks_foreach_iterable_before_body() {
        let program = Program::new(vec![Located::new(
            Stmt::Foreach {
                iterable: var("posts", 1),
                key_var: None,
                value_var: SmolStr::new("post"),
                body: vec![Located::new(
                    Stmt::Echo {
                        exprs: vec![var("post", 2)],
                    },
                    2,
                )],
            },
            1,
        )]);

        let mut recorder = Recorder::default();
        recorder.visit_program(&program);
        assert_eq!(recorder.stmts, 2);
        assert_eq!(recorder.variables, ["posts", "post"]);
    }

    #[test]
    fn walks_closure_bodies() {
        let closure = Located::new(
            Expr::Closure {
                params: vec![SmolStr::new("q")],
                captures: vec![SmolStr::new("outer")],
                body: vec![Located::new(
                    Stmt::Expr {
                        expr: var("inner", 3),
                    },
                    3,
                )],
            },
            3,
        );

        let mut recorder = Recorder::default();
        recorder.visit_expr(&closure);
        // The capture list holds bare names, not nodes; only the body is walked.
        assert_eq!(recorder.variables, ["inner"]);
    }

    #[test]
    fn do_while_visits_body_before_condition() {
        let stmt = Located::new(
            Stmt::DoWhile {
                body: vec![Located::new(
                    Stmt::Expr {
                        expr: var("row", 2),
                    },
                    2,
                )],
                condition: var("more", 3),
            },
            1,
        );

        let mut recorder = Recorder::default();
        recorder.visit_stmt(&stmt);
        assert_eq!(recorder.variables, ["row", "more"]);
    }
}
