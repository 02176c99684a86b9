//! # Call-chain decomposition
//!
//! Flattens a nested `a->b->c(...)` spine into its root expression plus an
//! ordered list of segments, so classification can look at a whole chain at
//! once instead of re-discovering it node by node while recursing.

use lazylint_syntax::{ClassRef, Expr, Located};
use smol_str::SmolStr;

/// The expression a chain hangs off.
#[derive(Debug)]
pub enum ChainRoot<'a> {
    /// `$posts->...`
    Variable { name: &'a SmolStr },
    /// `Post::...`
    Class { class: &'a ClassRef },
    /// `auth()->...`
    Function {
        name: &'a SmolStr,
        args: &'a [Located<Expr>],
    },
    /// Anything else (an index access, a nested unknown node, ...)
    Other(&'a Located<Expr>),
}

/// One link of a chain, in root-to-head order.
#[derive(Debug)]
pub enum Segment<'a> {
    Property {
        name: Option<&'a SmolStr>,
        line: u32,
    },
    Method {
        name: Option<&'a SmolStr>,
        args: &'a [Located<Expr>],
        line: u32,
    },
}

impl Segment<'_> {
    pub const fn line(&self) -> u32 {
        match self {
            Self::Property { line, .. } | Self::Method { line, .. } => *line,
        }
    }
}

/// A decomposed chain. For a class root, the static call itself is the
/// first segment (`User::where(...)->get()` has segments `where`, `get`).
#[derive(Debug)]
pub struct CallChain<'a> {
    pub root: ChainRoot<'a>,
    pub segments: Vec<Segment<'a>>,
    pub head_line: u32,
}

impl<'a> CallChain<'a> {
    /// Decompose a chain-head expression. Returns `None` when `expr` is not
    /// a property fetch or call.
    pub fn decompose(expr: &'a Located<Expr>) -> Option<Self> {
        let mut segments = Vec::new();
        let mut current = expr;
        let root = loop {
            match current.value() {
                Expr::MethodCall {
                    target,
                    method,
                    args,
                } => {
                    segments.push(Segment::Method {
                        name: method.as_ref(),
                        args,
                        line: current.line(),
                    });
                    current = target;
                }
                Expr::PropertyFetch { target, property } => {
                    segments.push(Segment::Property {
                        name: property.as_ref(),
                        line: current.line(),
                    });
                    current = target;
                }
                Expr::StaticCall {
                    class,
                    method,
                    args,
                } => {
                    segments.push(Segment::Method {
                        name: method.as_ref(),
                        args,
                        line: current.line(),
                    });
                    break ChainRoot::Class { class };
                }
                Expr::Variable { name } => break ChainRoot::Variable { name },
                Expr::FunctionCall { name, args } => break ChainRoot::Function { name, args },
                _ => break ChainRoot::Other(current),
            }
        };
        if segments.is_empty() {
            return None;
        }
        segments.reverse();
        Some(Self {
            root,
            segments,
            head_line: expr.line(),
        })
    }

    /// Number of call segments (property fetches excluded).
    pub fn method_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Method { .. }))
            .count()
    }

    /// Render the chain with elided arguments, e.g.
    /// `User::where(...)->first()`.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let class_root = matches!(self.root, ChainRoot::Class { .. });
        match &self.root {
            ChainRoot::Variable { name } => {
                out.push('$');
                out.push_str(name);
            }
            ChainRoot::Class { class } => out.push_str(class.effective_name()),
            ChainRoot::Function { name, args } => {
                out.push_str(name);
                push_args(&mut out, !args.is_empty());
            }
            ChainRoot::Other(_) => out.push_str("(...)"),
        }
        for (index, segment) in self.segments.iter().enumerate() {
            out.push_str(if index == 0 && class_root { "::" } else { "->" });
            match segment {
                Segment::Property { name, .. } => push_name(&mut out, *name),
                Segment::Method { name, args, .. } => {
                    push_name(&mut out, *name);
                    push_args(&mut out, !args.is_empty());
                }
            }
        }
        out
    }
}

fn push_name(out: &mut String, name: Option<&SmolStr>) {
    match name {
        Some(name) => out.push_str(name),
        None => out.push_str("{...}"),
    }
}

fn push_args(out: &mut String, has_args: bool) {
    out.push_str(if has_args { "(...)" } else { "()" });
}
