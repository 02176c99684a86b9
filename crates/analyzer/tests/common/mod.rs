//! Tree builders shared by the integration suites. Each helper mirrors one
//! node shape of the producer contract so tests read roughly like the
//! source they model; the comment above each test shows that source.
#![allow(dead_code)]

use lazylint_syntax::{ArrayItem, BinaryOp, ClassRef, Expr, Located, Program, Stmt};
use smol_str::SmolStr;

pub fn program(statements: Vec<Located<Stmt>>) -> Program {
    Program::new(statements)
}

// ---------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------

pub fn var(name: &str, line: u32) -> Located<Expr> {
    Located::new(
        Expr::Variable {
            name: SmolStr::new(name),
        },
        line,
    )
}

pub fn string(value: &str, line: u32) -> Located<Expr> {
    Located::new(
        Expr::StringLit {
            value: value.to_string(),
        },
        line,
    )
}

pub fn int(value: i64, line: u32) -> Located<Expr> {
    Located::new(Expr::IntLit { value }, line)
}

pub fn prop(target: Located<Expr>, name: &str, line: u32) -> Located<Expr> {
    Located::new(
        Expr::PropertyFetch {
            target: Box::new(target),
            property: Some(SmolStr::new(name)),
        },
        line,
    )
}

pub fn mcall(
    target: Located<Expr>,
    method: &str,
    args: Vec<Located<Expr>>,
    line: u32,
) -> Located<Expr> {
    Located::new(
        Expr::MethodCall {
            target: Box::new(target),
            method: Some(SmolStr::new(method)),
            args,
        },
        line,
    )
}

pub fn scall(class: &str, method: &str, args: Vec<Located<Expr>>, line: u32) -> Located<Expr> {
    Located::new(
        Expr::StaticCall {
            class: ClassRef::new(class),
            method: Some(SmolStr::new(method)),
            args,
        },
        line,
    )
}

pub fn scall_resolved(
    class: &str,
    resolved: &str,
    method: &str,
    args: Vec<Located<Expr>>,
    line: u32,
) -> Located<Expr> {
    Located::new(
        Expr::StaticCall {
            class: ClassRef::with_resolved(class, resolved),
            method: Some(SmolStr::new(method)),
            args,
        },
        line,
    )
}

pub fn assign(target: Located<Expr>, value: Located<Expr>, line: u32) -> Located<Expr> {
    Located::new(
        Expr::Assign {
            target: Box::new(target),
            value: Box::new(value),
        },
        line,
    )
}

pub fn binary(op: BinaryOp, left: Located<Expr>, right: Located<Expr>, line: u32) -> Located<Expr> {
    Located::new(
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        line,
    )
}

pub fn closure(
    params: &[&str],
    captures: &[&str],
    body: Vec<Located<Stmt>>,
    line: u32,
) -> Located<Expr> {
    Located::new(
        Expr::Closure {
            params: params.iter().map(|p| SmolStr::new(p)).collect(),
            captures: captures.iter().map(|c| SmolStr::new(c)).collect(),
            body,
        },
        line,
    )
}

pub fn array_of(values: Vec<Located<Expr>>, line: u32) -> Located<Expr> {
    Located::new(
        Expr::Array {
            items: values
                .into_iter()
                .map(|value| ArrayItem { key: None, value })
                .collect(),
        },
        line,
    )
}

// ---------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------

pub fn expr_stmt(expr: Located<Expr>, line: u32) -> Located<Stmt> {
    Located::new(Stmt::Expr { expr }, line)
}

pub fn echo(exprs: Vec<Located<Expr>>, line: u32) -> Located<Stmt> {
    Located::new(Stmt::Echo { exprs }, line)
}

pub fn foreach(
    iterable: Located<Expr>,
    value_var: &str,
    body: Vec<Located<Stmt>>,
    line: u32,
) -> Located<Stmt> {
    Located::new(
        Stmt::Foreach {
            iterable,
            key_var: None,
            value_var: SmolStr::new(value_var),
            body,
        },
        line,
    )
}

pub fn for_loop(
    init: Vec<Located<Expr>>,
    condition: Vec<Located<Expr>>,
    step: Vec<Located<Expr>>,
    body: Vec<Located<Stmt>>,
    line: u32,
) -> Located<Stmt> {
    Located::new(
        Stmt::For {
            init,
            condition,
            step,
            body,
        },
        line,
    )
}

pub fn while_loop(condition: Located<Expr>, body: Vec<Located<Stmt>>, line: u32) -> Located<Stmt> {
    Located::new(Stmt::While { condition, body }, line)
}

pub fn do_while(body: Vec<Located<Stmt>>, condition: Located<Expr>, line: u32) -> Located<Stmt> {
    Located::new(Stmt::DoWhile { body, condition }, line)
}

pub fn if_stmt(
    condition: Located<Expr>,
    then_branch: Vec<Located<Stmt>>,
    line: u32,
) -> Located<Stmt> {
    Located::new(
        Stmt::If {
            condition,
            then_branch,
            else_branch: None,
        },
        line,
    )
}
