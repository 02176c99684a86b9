//! # Deferred presence checks
//!
//! Records, per loop-bound variable, which relationships were defensively
//! checked for presence before use. A check on `(v, r)` suppresses reports
//! for `r` — and for paths below `r` — on `v` for the rest of the binding
//! loop: the surrounding code has already branched on the load state and is
//! presumed to handle both outcomes. Entries are purged per variable when
//! the binding loop exits, so checks never leak into sibling loops that
//! reuse the same variable name.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

#[derive(Debug, Default)]
pub struct DeferredChecks {
    entries: FxHashSet<(SmolStr, String)>,
}

impl DeferredChecks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_check(&mut self, var: impl Into<SmolStr>, path: impl Into<String>) {
        self.entries.insert((var.into(), path.into()));
    }

    /// Exact-path lookup.
    pub fn is_checked(&self, var: &str, path: &str) -> bool {
        self.entries
            .iter()
            .any(|(v, p)| v == var && p == path)
    }

    /// Whether `path` or any prefix of it was checked on `var`.
    pub fn covers(&self, var: &str, path: &str) -> bool {
        let mut prefix = String::with_capacity(path.len());
        for segment in path.split('.') {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(segment);
            if self.is_checked(var, &prefix) {
                return true;
            }
        }
        false
    }

    /// Drop every check recorded for `var`. Runs when its loop exits.
    pub fn clear_for_var(&mut self, var: &str) {
        self.entries.retain(|(v, _)| v != var);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_clears_per_variable() {
        let mut checks = DeferredChecks::new();
        checks.record_check("user", "profile");
        checks.record_check("post", "author");
        assert!(checks.is_checked("user", "profile"));

        checks.clear_for_var("user");
        assert!(!checks.is_checked("user", "profile"));
        assert!(checks.is_checked("post", "author"));
    }

    #[test]
    fn covers_deeper_paths_below_a_checked_relationship() {
        let mut checks = DeferredChecks::new();
        checks.record_check("user", "profile");
        assert!(checks.covers("user", "profile"));
        assert!(checks.covers("user", "profile.avatar"));
        assert!(!checks.covers("user", "team"));
        assert!(!checks.covers("other", "profile"));
    }
}
