//! # N+1 detection pass
//!
//! The single traversal that ties the trackers together. Walking a file's
//! tree once, the pass:
//!
//! - maintains the loop-frame stack, binding variables per loop kind
//!   (iteration variable of a `foreach`, initializer targets of a `for`,
//!   every variable referenced by a `while`/`do-while` condition);
//! - updates provenance on assignments, on incremental `load` calls, and by
//!   snapshot-copying a source collection's provenance onto its iteration
//!   variable;
//! - records defensive presence checks so already-guarded relationships stay
//!   quiet for the rest of their loop;
//! - reports relationship accesses on loop-bound variables that no
//!   directive covers, and query executions whose call chain depends on a
//!   variable of any enclosing loop.
//!
//! Chains are processed whole at their head expression; the pass descends
//! into chain roots and call arguments itself, so no chain is classified
//! twice on the way down.

use lazylint_diagnostics::{Issue, LoopKind};
use lazylint_syntax::{walk_expr, walk_stmt, Expr, Located, Program, Stmt, Visitor};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::debug;

use crate::analysis::Analysis;
use crate::chain::{CallChain, ChainRoot, Segment};
use crate::classify;
use crate::collector::IssueCollector;
use crate::config::AnalyzerConfig;
use crate::context::{AnalysisContext, LoopFrame};
use crate::dependency::{collect_variables, expr_references_variable};
use crate::provenance::expand_path;

/// Detects per-iteration lazy loads and loop-dependent queries.
pub struct NPlusOneAnalyzer;

impl Analysis for NPlusOneAnalyzer {
    fn analyze(&self, program: &Program, config: &AnalyzerConfig) -> Vec<Issue> {
        let mut pass = DetectionPass::new(config);
        pass.visit_program(program);
        pass.finish()
    }

    fn name(&self) -> &'static str {
        "NPlusOneAnalyzer"
    }
}

struct DetectionPass<'c> {
    config: &'c AnalyzerConfig,
    ctx: AnalysisContext,
    collector: IssueCollector,
}

impl<'c> DetectionPass<'c> {
    fn new(config: &'c AnalyzerConfig) -> Self {
        Self {
            config,
            ctx: AnalysisContext::new(),
            collector: IssueCollector::new(),
        }
    }

    fn finish(self) -> Vec<Issue> {
        self.collector.finish().into_iter().collect()
    }

    fn enter(&mut self, frame: LoopFrame) {
        debug!(kind = %frame.kind, line = frame.line, depth = self.ctx.loop_depth() + 1, "entering loop");
        self.ctx.enter_loop(frame);
    }

    /// Build the `foreach` frame and seed the iteration variable's
    /// provenance from the iterated expression: a snapshot of the source
    /// variable's provenance, or the directives of an inline chain
    /// (`foreach (Post::with('x')->get() as $p)`).
    fn enter_foreach(&mut self, iterable: &Located<Expr>, value_var: &SmolStr, line: u32) {
        let mut frame = LoopFrame::new(LoopKind::Foreach, line);
        frame.bind(value_var.clone());

        let mut seeded: FxHashSet<String> = FxHashSet::default();
        if let Some(source) = iterable.value().as_variable() {
            if let Some(known) = self.ctx.provenance.known(source) {
                seeded.extend(known.iter().cloned());
            }
        } else if let Some(chain) = CallChain::decompose(iterable) {
            for path in chain_directive_paths(&chain) {
                expand_path(path, &mut seeded);
            }
        }
        if seeded.is_empty() {
            self.ctx.provenance.clear(value_var);
        } else {
            self.ctx.provenance.replace_expanded(value_var.clone(), seeded);
        }

        self.enter(frame);
    }

    /// Provenance bookkeeping for `$target = <value>;`.
    fn track_assignment(&mut self, target: SmolStr, value: &Located<Expr>) {
        if let Some(source) = value.value().as_variable() {
            self.ctx.provenance.copy_snapshot(source, target);
            return;
        }
        match CallChain::decompose(value) {
            Some(chain) => {
                let directives = chain_directive_paths(&chain);
                if directives.is_empty() {
                    self.ctx.provenance.clear(&target);
                    return;
                }
                let mut expanded = FxHashSet::default();
                if let ChainRoot::Variable { name } = &chain.root {
                    if let Some(known) = self.ctx.provenance.known(name) {
                        expanded.extend(known.iter().cloned());
                    }
                }
                for path in directives {
                    expand_path(path, &mut expanded);
                }
                debug!(variable = %target, loaded = expanded.len(), "recorded eager-load directives");
                self.ctx.provenance.replace_expanded(target, expanded);
            }
            None => self.ctx.provenance.clear(&target),
        }
    }

    /// Classify one whole chain, then descend into its root and arguments.
    fn process_chain(&mut self, expr: &Located<Expr>) {
        let Some(chain) = CallChain::decompose(expr) else {
            walk_expr(self, expr);
            return;
        };

        match &chain.root {
            ChainRoot::Other(inner) => self.visit_expr(inner),
            ChainRoot::Function { args, .. } => {
                for arg in *args {
                    self.visit_expr(arg);
                }
            }
            ChainRoot::Variable { .. } | ChainRoot::Class { .. } => {}
        }
        for segment in &chain.segments {
            if let Segment::Method { args, .. } = segment {
                for arg in *args {
                    self.visit_expr(arg);
                }
            }
        }

        self.apply_chain_effects(&chain);
        self.check_relationship_access(&chain);
        self.check_query_in_loop(expr, &chain);
    }

    /// State updates a chain performs: incremental load calls extend the
    /// root variable's provenance, and presence checks on a loop-bound
    /// variable defer reporting for the named relationship.
    fn apply_chain_effects(&mut self, chain: &CallChain<'_>) {
        let ChainRoot::Variable { name: root } = &chain.root else {
            return;
        };

        for segment in &chain.segments {
            let Segment::Method {
                name: Some(method),
                args,
                ..
            } = segment
            else {
                continue;
            };
            if classify::is_merge_directive_call(method) {
                let paths = relationship_args(args);
                if !paths.is_empty() {
                    debug!(variable = %root, "merged eager-load directives");
                    self.ctx.provenance.merge_directive((*root).clone(), paths);
                }
            } else if classify::is_presence_check_call(method)
                && self.ctx.binding_frame(root).is_some()
            {
                if let Some(path) = args.first().and_then(|arg| arg.value().as_string_lit()) {
                    self.ctx.checked.record_check((*root).clone(), path);
                }
            }
        }
    }

    /// Report an uncovered relationship access on a loop-bound variable.
    fn check_relationship_access(&mut self, chain: &CallChain<'_>) {
        let ChainRoot::Variable { name } = &chain.root else {
            return;
        };
        let Some(frame) = self.ctx.binding_frame(name) else {
            return;
        };
        let loop_kind = frame.kind;

        let path = classify::leading_property_path(chain);
        if path.is_empty() {
            return;
        }

        // Report the shortest prefix of the access path that provenance
        // does not cover; deeper segments describe the same missing load.
        let mut prefix = String::new();
        for (index, segment) in path.iter().enumerate() {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(segment);
            if !self.ctx.provenance.covers(name, &prefix) {
                if !self.ctx.checked.covers(name, &prefix) {
                    let line = chain.segments[index].line();
                    self.collector
                        .add_relationship_issue(name, &prefix, line, loop_kind);
                }
                return;
            }
        }
    }

    /// Report a query execution whose chain depends on an enclosing loop's
    /// bound variable.
    fn check_query_in_loop(&mut self, expr: &Located<Expr>, chain: &CallChain<'_>) {
        if !self.ctx.in_loop() {
            return;
        }
        let has_exec = chain.segments.iter().any(|segment| {
            matches!(
                segment,
                Segment::Method { name: Some(name), .. } if classify::is_query_execution_call(name)
            )
        });
        if !has_exec || !classify::originates_from_data_source(chain) {
            return;
        }

        // Innermost frame whose bound variable the chain references wins;
        // an inner query may legitimately depend on an outer loop.
        let mut matched: Option<(SmolStr, LoopKind)> = None;
        'frames: for frame in self.ctx.frames() {
            for var in frame.bound_vars() {
                if expr_references_variable(expr, var) {
                    matched = Some((var.clone(), frame.kind));
                    break 'frames;
                }
            }
        }
        let Some((variable, loop_kind)) = matched else {
            return;
        };

        let complex = chain.method_count() >= self.config.complex_chain_threshold;
        self.collector.add_query_issue(
            chain.describe(),
            chain.head_line,
            loop_kind,
            &variable,
            complex,
        );
    }
}

impl Visitor for DetectionPass<'_> {
    fn visit_stmt(&mut self, stmt: &Located<Stmt>) {
        match stmt.value() {
            Stmt::Foreach {
                iterable,
                value_var,
                body,
                ..
            } => {
                // The iterable is evaluated once, before any iteration.
                self.visit_expr(iterable);
                self.enter_foreach(iterable, value_var, stmt.line());
                self.visit_body(body);
                self.ctx.leave_loop();
            }
            Stmt::For {
                init,
                condition,
                step,
                body,
            } => {
                for expr in init {
                    self.visit_expr(expr);
                }
                let mut frame = LoopFrame::new(LoopKind::For, stmt.line());
                for expr in init {
                    if let Expr::Assign { target, .. } = expr.value() {
                        if let Some(name) = target.value().as_variable() {
                            frame.bind(name.clone());
                        }
                    }
                }
                self.enter(frame);
                for expr in condition {
                    self.visit_expr(expr);
                }
                self.visit_body(body);
                for expr in step {
                    self.visit_expr(expr);
                }
                self.ctx.leave_loop();
            }
            Stmt::While { condition, body } => {
                self.enter(condition_frame(LoopKind::While, stmt.line(), condition));
                self.visit_expr(condition);
                self.visit_body(body);
                self.ctx.leave_loop();
            }
            Stmt::DoWhile { body, condition } => {
                self.enter(condition_frame(LoopKind::DoWhile, stmt.line(), condition));
                self.visit_body(body);
                self.visit_expr(condition);
                self.ctx.leave_loop();
            }
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, expr: &Located<Expr>) {
        match expr.value() {
            Expr::Assign { target, value } => {
                self.visit_expr(target);
                self.visit_expr(value);
                if let Some(name) = target.value().as_variable() {
                    self.track_assignment(name.clone(), value);
                }
            }
            Expr::MethodCall { .. } | Expr::StaticCall { .. } | Expr::PropertyFetch { .. } => {
                self.process_chain(expr);
            }
            _ => walk_expr(self, expr),
        }
    }
}

/// Frame for a condition-driven loop: every variable the condition
/// references, however deeply, is loop-bound.
fn condition_frame(kind: LoopKind, line: u32, condition: &Located<Expr>) -> LoopFrame {
    let mut frame = LoopFrame::new(kind, line);
    let mut vars = FxHashSet::default();
    collect_variables(condition, &mut vars);
    for name in vars {
        frame.bind(name);
    }
    frame
}

/// Relationship names carried by a directive call's arguments: a single
/// name, a list of names, or a mapping whose keys are names (the values
/// being per-relationship customization callbacks, ignored here).
fn relationship_args<'a>(args: &'a [Located<Expr>]) -> Vec<&'a str> {
    let mut paths = Vec::new();
    for arg in args {
        match arg.value() {
            Expr::StringLit { value } => paths.push(value.as_str()),
            Expr::Array { items } => {
                for item in items {
                    let name = match &item.key {
                        Some(key) => key.value().as_string_lit(),
                        None => item.value.value().as_string_lit(),
                    };
                    if let Some(name) = name {
                        paths.push(name);
                    }
                }
            }
            _ => {}
        }
    }
    paths
}

/// All eager-load paths named anywhere in a chain.
fn chain_directive_paths<'a>(chain: &CallChain<'a>) -> Vec<&'a str> {
    let mut paths = Vec::new();
    for segment in &chain.segments {
        if let Segment::Method {
            name: Some(name),
            args,
            ..
        } = segment
        {
            if classify::is_eager_directive_call(name) {
                paths.extend(relationship_args(args));
            }
        }
    }
    paths
}
