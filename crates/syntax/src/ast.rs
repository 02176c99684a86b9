//! # Syntax tree model
//!
//! This module defines the tree consumed by the analyzers. The tree is
//! produced outside this workspace — a parser for the analyzed language
//! builds it (and optionally runs an alias-resolution pass over name
//! references) before handing it over, so the types here are a read-only
//! data model, not a parse result.
//!
//! Every construct is a closed tagged union keyed by a `kind` discriminant,
//! enabling exhaustive matching. Node kinds the producer emits that this
//! model does not know about decode into the inert [`Stmt::Unknown`] /
//! [`Expr::Unknown`] variants and are skipped by every analysis.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A node paired with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Located<T> {
    #[serde(flatten)]
    node: T,
    line: u32,
}

impl<T> Located<T> {
    /// Create a new located value
    pub const fn new(node: T, line: u32) -> Self {
        Self { node, line }
    }

    /// Get the inner node
    pub const fn value(&self) -> &T {
        &self.node
    }

    /// Get the 1-based source line
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Destructure into node and line
    pub fn into_parts(self) -> (T, u32) {
        (self.node, self.line)
    }
}

/// Root of a file's tree: the ordered top-level statements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Located<Stmt>>,
}

impl Program {
    pub fn new(statements: Vec<Located<Stmt>>) -> Self {
        Self { statements }
    }
}

/// A reference to a class-like symbol (the receiver of a static call).
///
/// `resolved` carries the fully-qualified name attached by the producer's
/// alias-resolution pass, when it ran. Consumers fall back to the literal
/// `name` when it is absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassRef {
    pub name: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<SmolStr>,
}

impl ClassRef {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            resolved: None,
        }
    }

    pub fn with_resolved(name: impl Into<SmolStr>, resolved: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            resolved: Some(resolved.into()),
        }
    }

    /// The name to classify against: the last segment of the resolved
    /// fully-qualified name when present, the literal name otherwise.
    pub fn effective_name(&self) -> &str {
        match &self.resolved {
            Some(resolved) => resolved.rsplit('\\').next().unwrap_or(resolved),
            None => &self.name,
        }
    }
}

/// One element of an array literal, with an optional key expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Located<Expr>>,
    pub value: Located<Expr>,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
    Eq,
    NotEq,
    Identical,
    NotIdentical,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
    Coalesce,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Not,
    Neg,
}

/// Represents a statement in the analyzed language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stmt {
    /// Expression used as a statement (e.g., `$posts->load('author');`)
    Expr { expr: Located<Expr> },
    /// Output statement (e.g., `echo $post->title;`)
    Echo { exprs: Vec<Located<Expr>> },
    /// Conditional. `elseif` chains arrive as nested `If` in `else_branch`.
    If {
        condition: Located<Expr>,
        then_branch: Vec<Located<Stmt>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_branch: Option<Vec<Located<Stmt>>>,
    },
    /// Collection iteration (e.g., `foreach ($posts as $post) { ... }`)
    Foreach {
        iterable: Located<Expr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key_var: Option<SmolStr>,
        value_var: SmolStr,
        body: Vec<Located<Stmt>>,
    },
    /// C-style loop. Init, condition and step are expression lists.
    For {
        init: Vec<Located<Expr>>,
        condition: Vec<Located<Expr>>,
        step: Vec<Located<Expr>>,
        body: Vec<Located<Stmt>>,
    },
    While {
        condition: Located<Expr>,
        body: Vec<Located<Stmt>>,
    },
    DoWhile {
        body: Vec<Located<Stmt>>,
        condition: Located<Expr>,
    },
    Return {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Located<Expr>>,
    },
    /// Free function declaration
    Function {
        name: SmolStr,
        params: Vec<SmolStr>,
        body: Vec<Located<Stmt>>,
    },
    /// Class declaration; `body` holds the method declarations.
    Class {
        name: SmolStr,
        body: Vec<Located<Stmt>>,
    },
    Block { body: Vec<Located<Stmt>> },
    /// Any statement kind this model does not represent. Inert.
    #[serde(other)]
    Unknown,
}

/// Represents an expression in the analyzed language.
///
/// Member names are `Option<SmolStr>`: `None` models a member computed at
/// runtime (`$obj->$prop`), which no classifier can say anything about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// Variable reference (e.g., `$post`)
    Variable { name: SmolStr },
    StringLit { value: String },
    IntLit { value: i64 },
    BoolLit { value: bool },
    Null,
    Array { items: Vec<ArrayItem> },
    /// Array/collection indexing (e.g., `$rows[0]`)
    Index {
        target: Box<Located<Expr>>,
        index: Box<Located<Expr>>,
    },
    /// Instance property access (e.g., `$post->author`)
    PropertyFetch {
        target: Box<Located<Expr>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        property: Option<SmolStr>,
    },
    /// Instance method call (e.g., `$posts->load('author')`)
    MethodCall {
        target: Box<Located<Expr>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        method: Option<SmolStr>,
        args: Vec<Located<Expr>>,
    },
    /// Static/class-level call (e.g., `Post::with('author')`)
    StaticCall {
        class: ClassRef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        method: Option<SmolStr>,
        args: Vec<Located<Expr>>,
    },
    /// Free function call (e.g., `count($items)`)
    FunctionCall {
        name: SmolStr,
        args: Vec<Located<Expr>>,
    },
    Assign {
        target: Box<Located<Expr>>,
        value: Box<Located<Expr>>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Located<Expr>>,
        right: Box<Located<Expr>>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Located<Expr>>,
    },
    /// Ternary; `then_branch` is `None` for the short form (`$a ?: $b`).
    Ternary {
        condition: Box<Located<Expr>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        then_branch: Option<Box<Located<Expr>>>,
        else_branch: Box<Located<Expr>>,
    },
    /// Anonymous function with an explicit capture list and a statement body.
    Closure {
        params: Vec<SmolStr>,
        #[serde(default)]
        captures: Vec<SmolStr>,
        body: Vec<Located<Stmt>>,
    },
    /// Short closure with a single expression body; captures implicitly.
    ArrowFn {
        params: Vec<SmolStr>,
        body: Box<Located<Expr>>,
    },
    /// Any expression kind this model does not represent. Inert.
    #[serde(other)]
    Unknown,
}

impl Expr {
    /// The variable name if this is a bare variable reference.
    pub fn as_variable(&self) -> Option<&SmolStr> {
        match self {
            Self::Variable { name } => Some(name),
            _ => None,
        }
    }

    /// The literal string value if this is a string literal.
    pub fn as_string_lit(&self) -> Option<&str> {
        match self {
            Self::StringLit { value } => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, line: u32) -> Located<Expr> {
        Located::new(
            Expr::Variable {
                name: SmolStr::new(name),
            },
            line,
        )
    }

    #[test]
    fn located_accessors() {
        let expr = var("post", 7);
        assert_eq!(expr.line(), 7);
        assert_eq!(expr.value().as_variable().unwrap(), "post");
    }

    #[test]
    fn serde_round_trip_keeps_kind_tags() {
        let fetch = Located::new(
            Expr::PropertyFetch {
                target: Box::new(var("post", 3)),
                property: Some(SmolStr::new("author")),
            },
            3,
        );
        let json = serde_json::to_value(&fetch).unwrap();
        assert_eq!(json["kind"], "property_fetch");
        assert_eq!(json["line"], 3);
        assert_eq!(json["target"]["kind"], "variable");

        let back: Located<Expr> = serde_json::from_value(json).unwrap();
        assert_eq!(back, fetch);
    }

    #[test]
    fn unknown_expression_kind_is_inert() {
        let json = r#"{"kind": "match_arm", "line": 12, "whatever": [1, 2]}"#;
        let expr: Located<Expr> = serde_json::from_str(json).unwrap();
        assert_eq!(*expr.value(), Expr::Unknown);
    }

    #[test]
    fn unknown_statement_kind_is_inert() {
        let json = r#"{"kind": "goto", "line": 4, "label": "retry"}"#;
        let stmt: Located<Stmt> = serde_json::from_str(json).unwrap();
        assert_eq!(*stmt.value(), Stmt::Unknown);
    }

    #[test]
    fn class_ref_prefers_resolved_tail() {
        let plain = ClassRef::new("Post");
        assert_eq!(plain.effective_name(), "Post");

        let aliased = ClassRef::with_resolved("DB", "Illuminate\\Support\\Facades\\DB");
        assert_eq!(aliased.effective_name(), "DB");
    }
}
