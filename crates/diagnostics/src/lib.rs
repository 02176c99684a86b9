//! # lazylint diagnostics
//!
//! The issue data model shared between the analyzers and hosts, and the
//! presentation helpers that turn an issue plus the original source text
//! into a human-facing report.

pub mod issues;
pub mod reporting;

pub use issues::{Issue, IssueCode, IssueCollection, LoopKind, Severity};
pub use reporting::build_issue_message;
