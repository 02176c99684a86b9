//! # Loop context
//!
//! Explicit analysis state threaded through the traversal: the stack of
//! enclosing loop frames plus the provenance and deferred-check trackers.
//! A fresh context is built per file; nothing here outlives one traversal,
//! which is what makes whole-file analyses independent and freely
//! parallelizable across files.

use indexmap::IndexSet;
use lazylint_diagnostics::LoopKind;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::deferred::DeferredChecks;
use crate::provenance::ProvenanceMap;

/// One enclosing loop: its kind, entry line, and loop-bound variables.
///
/// Bound variables keep insertion order so that dependency matching is
/// deterministic when a frame binds several names.
#[derive(Debug)]
pub struct LoopFrame {
    pub kind: LoopKind,
    pub line: u32,
    bound: IndexSet<SmolStr, FxBuildHasher>,
}

impl LoopFrame {
    pub fn new(kind: LoopKind, line: u32) -> Self {
        Self {
            kind,
            line,
            bound: IndexSet::default(),
        }
    }

    pub fn bind(&mut self, name: impl Into<SmolStr>) {
        self.bound.insert(name.into());
    }

    pub fn binds(&self, name: &str) -> bool {
        self.bound.contains(name)
    }

    pub fn bound_vars(&self) -> impl Iterator<Item = &SmolStr> {
        self.bound.iter()
    }
}

/// Analysis state for one file's traversal.
#[derive(Debug, Default)]
pub struct AnalysisContext {
    frames: SmallVec<[LoopFrame; 4]>,
    pub provenance: ProvenanceMap,
    pub checked: DeferredChecks,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_loop(&mut self, frame: LoopFrame) {
        self.frames.push(frame);
    }

    /// Pop the innermost frame and purge its variables' deferred checks.
    pub fn leave_loop(&mut self) {
        if let Some(frame) = self.frames.pop() {
            for var in frame.bound_vars() {
                self.checked.clear_for_var(var);
            }
        }
    }

    pub fn in_loop(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn loop_depth(&self) -> usize {
        self.frames.len()
    }

    /// Enclosing frames, innermost first.
    pub fn frames(&self) -> impl Iterator<Item = &LoopFrame> {
        self.frames.iter().rev()
    }

    /// The innermost frame binding `name`, if any.
    ///
    /// Lookup is innermost-first so an inner loop rebinding a name shadows
    /// the outer binding, while an outer loop's variable is still found
    /// from inside nested loops.
    pub fn binding_frame(&self, name: &str) -> Option<&LoopFrame> {
        self.frames().find(|frame| frame.binds(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_depth_tracks_nesting() {
        let mut ctx = AnalysisContext::new();
        assert!(!ctx.in_loop());

        let mut outer = LoopFrame::new(LoopKind::Foreach, 1);
        outer.bind("post");
        ctx.enter_loop(outer);
        let mut inner = LoopFrame::new(LoopKind::While, 3);
        inner.bind("row");
        ctx.enter_loop(inner);
        assert_eq!(ctx.loop_depth(), 2);

        ctx.leave_loop();
        assert_eq!(ctx.loop_depth(), 1);
        ctx.leave_loop();
        assert!(!ctx.in_loop());
    }

    #[test]
    fn binding_lookup_is_innermost_first() {
        let mut ctx = AnalysisContext::new();
        let mut outer = LoopFrame::new(LoopKind::Foreach, 1);
        outer.bind("item");
        outer.bind("post");
        ctx.enter_loop(outer);
        let mut inner = LoopFrame::new(LoopKind::Foreach, 5);
        inner.bind("item");
        ctx.enter_loop(inner);

        // The inner rebinding of `item` shadows the outer one.
        assert_eq!(ctx.binding_frame("item").unwrap().line, 5);
        // The outer-only binding is still visible from inside.
        assert_eq!(ctx.binding_frame("post").unwrap().line, 1);
        assert!(ctx.binding_frame("user").is_none());
    }

    #[test]
    fn leaving_a_loop_purges_its_deferred_checks() {
        let mut ctx = AnalysisContext::new();
        let mut frame = LoopFrame::new(LoopKind::Foreach, 1);
        frame.bind("user");
        ctx.enter_loop(frame);
        ctx.checked.record_check("user", "profile");
        assert!(ctx.checked.covers("user", "profile"));

        ctx.leave_loop();
        assert!(!ctx.checked.covers("user", "profile"));
    }
}
