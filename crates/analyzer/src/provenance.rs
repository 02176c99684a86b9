//! # Provenance tracking
//!
//! Maps a variable name to the set of relationship paths known to have been
//! bulk pre-loaded for it. Entries are created when a variable is assigned
//! from a directive-bearing expression, extended by incremental load calls
//! on an existing variable, and snapshot-copied from a source collection to
//! its loop alias on loop entry.
//!
//! Every recorded path is stored expanded into its full prefix chain:
//! recording `a.b.c` stores `{a, a.b, a.b.c}`, so both shallow and deep
//! accesses against that provenance are recognized as covered. Tracking is
//! forward-only and file-local; nothing survives past one traversal.

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

/// Expand a dot-separated path into `into` as its full prefix chain.
pub fn expand_path(path: &str, into: &mut FxHashSet<String>) {
    let mut prefix = String::new();
    for segment in path.split('.') {
        if segment.is_empty() {
            continue;
        }
        if !prefix.is_empty() {
            prefix.push('.');
        }
        prefix.push_str(segment);
        into.insert(prefix.clone());
    }
}

/// Per-variable pre-load knowledge for one file.
#[derive(Debug, Default)]
pub struct ProvenanceMap {
    vars: FxHashMap<SmolStr, FxHashSet<String>>,
}

impl ProvenanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace `var`'s provenance with the expansion of `paths`.
    pub fn record_directive<'a>(
        &mut self,
        var: impl Into<SmolStr>,
        paths: impl IntoIterator<Item = &'a str>,
    ) {
        let mut expanded = FxHashSet::default();
        for path in paths {
            expand_path(path, &mut expanded);
        }
        self.vars.insert(var.into(), expanded);
    }

    /// Union the expansion of `paths` into `var`'s existing provenance.
    pub fn merge_directive<'a>(
        &mut self,
        var: impl Into<SmolStr>,
        paths: impl IntoIterator<Item = &'a str>,
    ) {
        let entry = self.vars.entry(var.into()).or_default();
        for path in paths {
            let mut expanded = FxHashSet::default();
            expand_path(path, &mut expanded);
            entry.extend(expanded);
        }
    }

    /// Replace `var`'s provenance with an already-expanded set.
    pub fn replace_expanded(&mut self, var: impl Into<SmolStr>, expanded: FxHashSet<String>) {
        self.vars.insert(var.into(), expanded);
    }

    /// Forget everything known about `var`.
    pub fn clear(&mut self, var: &str) {
        self.vars.remove(var);
    }

    /// Copy `from`'s provenance onto `to` as an independent snapshot.
    ///
    /// Later changes to either variable do not affect the other; forward-only
    /// single-pass semantics need no live aliasing.
    pub fn copy_snapshot(&mut self, from: &str, to: impl Into<SmolStr>) {
        let to = to.into();
        match self.vars.get(from) {
            Some(set) => {
                let snapshot = set.clone();
                self.vars.insert(to, snapshot);
            }
            None => {
                self.vars.remove(&to);
            }
        }
    }

    /// The expanded provenance set for `var`, if any was recorded.
    pub fn known(&self, var: &str) -> Option<&FxHashSet<String>> {
        self.vars.get(var)
    }

    /// Whether `path` is covered by `var`'s recorded provenance.
    pub fn covers(&self, var: &str, path: &str) -> bool {
        self.vars.get(var).is_some_and(|set| set.contains(path))
    }
}
