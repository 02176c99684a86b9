//! # Issue model
//!
//! Structured findings produced by the analyzers. An [`Issue`] carries
//! everything a host needs to render a human message and a recommendation:
//! the issue code, source line, the loop construct it was found in, the
//! bound variable involved, and the subject (a relationship path or a
//! rendered query-chain description). Issues are immutable once created.

use std::fmt;

use ariadne::ReportKind;
use smol_str::SmolStr;

/// A finding from analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Issue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
    /// 1-based source line the finding anchors to
    pub line: u32,
    /// The loop construct the finding was observed in
    pub loop_kind: LoopKind,
    /// The loop-bound variable involved
    pub variable: SmolStr,
    /// Relationship path or query-chain description
    pub subject: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl From<Severity> for ReportKind<'static> {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => Self::Error,
            Severity::Warning => Self::Warning,
            Severity::Info => Self::Advice,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCode {
    /// A relationship accessed inside a loop without a prior bulk pre-load
    LazyRelationshipLoad,
    /// A query executed inside a loop with loop-dependent parameters
    DependentQueryInLoop,
}

impl From<IssueCode> for u32 {
    fn from(code: IssueCode) -> Self {
        // Performance-issue range
        match code {
            IssueCode::LazyRelationshipLoad => 6001,
            IssueCode::DependentQueryInLoop => 6002,
        }
    }
}

/// The loop construct a finding was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    Foreach,
    For,
    While,
    DoWhile,
}

impl fmt::Display for LoopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Foreach => write!(f, "foreach loop"),
            Self::For => write!(f, "for loop"),
            Self::While => write!(f, "while loop"),
            Self::DoWhile => write!(f, "do-while loop"),
        }
    }
}

impl Issue {
    /// A relationship on a loop variable is lazily loaded per iteration.
    pub fn lazy_relationship(
        variable: impl Into<SmolStr>,
        path: impl Into<String>,
        line: u32,
        loop_kind: LoopKind,
    ) -> Self {
        let variable = variable.into();
        let path = path.into();
        Self {
            severity: Severity::Warning,
            code: IssueCode::LazyRelationshipLoad,
            message: format!(
                "Relationship '{path}' on '${variable}' is lazily loaded on every iteration of this {loop_kind}"
            ),
            line,
            loop_kind,
            variable,
            subject: path,
        }
    }

    /// A query inside a loop is parameterized by a loop variable.
    pub fn dependent_query(
        description: impl Into<String>,
        line: u32,
        loop_kind: LoopKind,
        variable: impl Into<SmolStr>,
        complex_chain: bool,
    ) -> Self {
        let variable = variable.into();
        let description = description.into();
        let message = if complex_chain {
            format!(
                "Complex query chain `{description}` runs inside this {loop_kind} and depends on loop variable '${variable}'"
            )
        } else {
            format!(
                "Query `{description}` runs inside this {loop_kind} and depends on loop variable '${variable}'"
            )
        };
        Self {
            severity: Severity::Warning,
            code: IssueCode::DependentQueryInLoop,
            message,
            line,
            loop_kind,
            variable,
            subject: description,
        }
    }

    /// Recommendation text for this issue's code.
    pub fn help(&self) -> &'static str {
        match self.code {
            IssueCode::LazyRelationshipLoad => {
                "eager-load the relationship on the source collection before iterating, e.g. with('...') or load('...')"
            }
            IssueCode::DependentQueryInLoop => {
                "hoist the query out of the loop and fetch all rows in one batched call (whereIn on the collected keys, or a chunked iteration)"
            }
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (line {})", self.severity, self.message, self.line)
    }
}

/// Findings collected from one file's analysis.
///
/// Issues are kept in emission order, which follows traversal order over the
/// tree; hosts needing a stable presentation order call [`sort_by_line`].
///
/// [`sort_by_line`]: IssueCollection::sort_by_line
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IssueCollection {
    issues: Vec<Issue>,
}

impl IssueCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, issues: impl IntoIterator<Item = Issue>) {
        self.issues.extend(issues);
    }

    pub fn all(&self) -> &[Issue] {
        &self.issues
    }

    pub const fn len(&self) -> usize {
        self.issues.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.issues.iter()
    }

    /// Stable sort by source line, ties broken by issue code.
    pub fn sort_by_line(&mut self) {
        self.issues
            .sort_by_key(|issue| (issue.line, u32::from(issue.code)));
    }
}

impl From<Vec<Issue>> for IssueCollection {
    fn from(issues: Vec<Issue>) -> Self {
        Self { issues }
    }
}

impl IntoIterator for IssueCollection {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lazy_relationship_issue_fields() {
        let issue = Issue::lazy_relationship("post", "author", 12, LoopKind::Foreach);
        assert_eq!(issue.severity, Severity::Warning);
        assert_eq!(issue.code, IssueCode::LazyRelationshipLoad);
        assert_eq!(issue.line, 12);
        assert_eq!(issue.variable, "post");
        assert_eq!(issue.subject, "author");
        assert!(issue.message.contains("author"));
        assert!(issue.message.contains("$post"));
    }

    #[test]
    fn dependent_query_issue_display() {
        let issue = Issue::dependent_query(
            "User::where(...)->first()",
            4,
            LoopKind::Foreach,
            "id",
            false,
        );
        insta::assert_snapshot!(
            issue.to_string(),
            @"warning: Query `User::where(...)->first()` runs inside this foreach loop and depends on loop variable '$id' (line 4)"
        );
    }

    #[test]
    fn complex_chain_changes_wording() {
        let simple =
            Issue::dependent_query("Order::where(...)->get()", 9, LoopKind::While, "id", false);
        let complex =
            Issue::dependent_query("Order::where(...)->get()", 9, LoopKind::While, "id", true);
        assert!(!simple.message.contains("Complex"));
        assert!(complex.message.starts_with("Complex query chain"));
    }

    #[test]
    fn sort_by_line_is_stable() {
        let mut collection = IssueCollection::new();
        collection.add(Issue::dependent_query(
            "User::find(...)",
            8,
            LoopKind::Foreach,
            "id",
            false,
        ));
        collection.add(Issue::lazy_relationship("post", "author", 3, LoopKind::Foreach));
        collection.add(Issue::lazy_relationship("post", "tags", 3, LoopKind::Foreach));
        collection.sort_by_line();

        let lines: Vec<u32> = collection.iter().map(|issue| issue.line).collect();
        assert_eq!(lines, [3, 3, 8]);
        // Same line keeps emission order for equal codes
        assert_eq!(collection.all()[0].subject, "author");
        assert_eq!(collection.all()[1].subject, "tags");
    }

    #[test]
    fn issue_codes_are_distinct() {
        assert_ne!(
            u32::from(IssueCode::LazyRelationshipLoad),
            u32::from(IssueCode::DependentQueryInLoop)
        );
    }
}
