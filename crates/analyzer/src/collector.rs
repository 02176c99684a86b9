//! # Issue collection
//!
//! Accumulates findings during one file's traversal and deduplicates them:
//! relationship issues on `(bound variable, path)` — the same chain on the
//! same variable reports once however many times the loop touches it — and
//! query issues on `(description, line)`, so identical calls at different
//! locations stay distinct findings.

use lazylint_diagnostics::{Issue, IssueCollection, LoopKind};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::debug;

#[derive(Debug, Default)]
pub struct IssueCollector {
    issues: IssueCollection,
    seen_relationships: FxHashSet<(SmolStr, String)>,
    seen_queries: FxHashSet<(String, u32)>,
}

impl IssueCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_relationship_issue(
        &mut self,
        variable: &SmolStr,
        path: &str,
        line: u32,
        loop_kind: LoopKind,
    ) {
        if !self
            .seen_relationships
            .insert((variable.clone(), path.to_string()))
        {
            return;
        }
        debug!(variable = %variable, path, line, "lazy relationship access");
        self.issues
            .add(Issue::lazy_relationship(variable.clone(), path, line, loop_kind));
    }

    pub fn add_query_issue(
        &mut self,
        description: String,
        line: u32,
        loop_kind: LoopKind,
        variable: &SmolStr,
        complex_chain: bool,
    ) {
        if !self.seen_queries.insert((description.clone(), line)) {
            return;
        }
        debug!(%description, line, "loop-dependent query");
        self.issues.add(Issue::dependent_query(
            description,
            line,
            loop_kind,
            variable.clone(),
            complex_chain,
        ));
    }

    pub fn finish(self) -> IssueCollection {
        self.issues
    }
}
