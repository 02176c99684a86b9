//! # lazylint syntax
//!
//! Tree model and traversal for the lazylint analyzers. The tree itself is
//! built by an external parser for the analyzed language; this crate only
//! defines the shape it arrives in (a closed tagged union per construct),
//! the JSON boundary it crosses, and a generic visitor for walking it.

pub mod ast;
pub mod decode;
pub mod visitor;

pub use ast::{ArrayItem, BinaryOp, ClassRef, Expr, Located, Program, Stmt, UnaryOp};
pub use decode::{program_from_json, TreeDecodeError};
pub use visitor::{walk_expr, walk_program, walk_stmt, Visitor};
