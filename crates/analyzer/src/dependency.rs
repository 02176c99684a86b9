//! # Dependency analysis
//!
//! Decides whether an expression's value varies with a given loop-bound
//! variable by structural recursion over its subtree. Closures are the one
//! subtle case: a captured-but-unused variable is not a dependency, so the
//! walk descends into closure *bodies* rather than trusting the declared
//! capture list, and a parameter that rebinds the tested name stops the
//! descent (references past that point hit the parameter, not the loop
//! variable).

use lazylint_syntax::{walk_expr, Expr, Located, Stmt, Visitor};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// Whether `expr` structurally references the variable `name`.
pub fn expr_references_variable(expr: &Located<Expr>, name: &str) -> bool {
    match expr.value() {
        Expr::Variable { name: var } => var == name,
        Expr::StringLit { .. }
        | Expr::IntLit { .. }
        | Expr::BoolLit { .. }
        | Expr::Null
        | Expr::Unknown => false,
        Expr::Array { items } => items.iter().any(|item| {
            item.key
                .as_ref()
                .is_some_and(|key| expr_references_variable(key, name))
                || expr_references_variable(&item.value, name)
        }),
        Expr::Index { target, index } => {
            expr_references_variable(target, name) || expr_references_variable(index, name)
        }
        Expr::PropertyFetch { target, .. } => expr_references_variable(target, name),
        Expr::MethodCall { target, args, .. } => {
            expr_references_variable(target, name)
                || args.iter().any(|arg| expr_references_variable(arg, name))
        }
        Expr::StaticCall { args, .. } | Expr::FunctionCall { args, .. } => {
            args.iter().any(|arg| expr_references_variable(arg, name))
        }
        Expr::Assign { target, value } => {
            expr_references_variable(target, name) || expr_references_variable(value, name)
        }
        Expr::Binary { left, right, .. } => {
            expr_references_variable(left, name) || expr_references_variable(right, name)
        }
        Expr::Unary { operand, .. } => expr_references_variable(operand, name),
        Expr::Ternary {
            condition,
            then_branch,
            else_branch,
        } => {
            expr_references_variable(condition, name)
                || then_branch
                    .as_ref()
                    .is_some_and(|branch| expr_references_variable(branch, name))
                || expr_references_variable(else_branch, name)
        }
        Expr::Closure { params, body, .. } => {
            // The capture list is ignored on purpose: capturing without use
            // is not a dependency. A shadowing parameter cuts the search.
            !params.iter().any(|param| param == name)
                && body.iter().any(|stmt| stmt_references_variable(stmt, name))
        }
        Expr::ArrowFn { params, body } => {
            !params.iter().any(|param| param == name) && expr_references_variable(body, name)
        }
    }
}

/// Statement-level companion of [`expr_references_variable`], needed to
/// search closure bodies.
pub fn stmt_references_variable(stmt: &Located<Stmt>, name: &str) -> bool {
    match stmt.value() {
        Stmt::Expr { expr } => expr_references_variable(expr, name),
        Stmt::Echo { exprs } => exprs.iter().any(|expr| expr_references_variable(expr, name)),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            expr_references_variable(condition, name)
                || branch_references_variable(then_branch, name)
                || else_branch
                    .as_ref()
                    .is_some_and(|branch| branch_references_variable(branch, name))
        }
        Stmt::Foreach {
            iterable,
            value_var,
            body,
            ..
        } => {
            // A foreach rebinding the name shadows it for its body.
            expr_references_variable(iterable, name)
                || (value_var != name && branch_references_variable(body, name))
        }
        Stmt::For {
            init,
            condition,
            step,
            body,
        } => {
            init.iter().any(|expr| expr_references_variable(expr, name))
                || condition
                    .iter()
                    .any(|expr| expr_references_variable(expr, name))
                || step.iter().any(|expr| expr_references_variable(expr, name))
                || branch_references_variable(body, name)
        }
        Stmt::While { condition, body } => {
            expr_references_variable(condition, name) || branch_references_variable(body, name)
        }
        Stmt::DoWhile { body, condition } => {
            branch_references_variable(body, name) || expr_references_variable(condition, name)
        }
        Stmt::Return { value } => value
            .as_ref()
            .is_some_and(|value| expr_references_variable(value, name)),
        Stmt::Block { body } => branch_references_variable(body, name),
        // Named functions and classes open fresh scopes with no capture.
        Stmt::Function { .. } | Stmt::Class { .. } | Stmt::Unknown => false,
    }
}

fn branch_references_variable(body: &[Located<Stmt>], name: &str) -> bool {
    body.iter().any(|stmt| stmt_references_variable(stmt, name))
}

/// Collect every variable referenced anywhere under `expr`, including
/// closure bodies. Used to extract the bound variables of a `while` /
/// `do-while` condition.
pub fn collect_variables(expr: &Located<Expr>, into: &mut FxHashSet<SmolStr>) {
    struct Collector<'a> {
        into: &'a mut FxHashSet<SmolStr>,
    }

    impl Visitor for Collector<'_> {
        fn visit_expr(&mut self, expr: &Located<Expr>) {
            if let Expr::Variable { name } = expr.value() {
                self.into.insert(name.clone());
            }
            walk_expr(self, expr);
        }
    }

    Collector { into }.visit_expr(expr);
}
