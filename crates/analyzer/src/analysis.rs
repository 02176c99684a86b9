//! # Analysis trait and registry
//!
//! The seam between the engine and a host driver. Each analysis is a
//! stateless value that walks one file's tree and returns its findings; the
//! registry runs every registered analysis over a file and collects the
//! results. The surrounding system's simpler single-pass checks plug in
//! here as further [`Analysis`] implementations.

use lazylint_diagnostics::{Issue, IssueCollection};
use lazylint_syntax::Program;

use crate::config::AnalyzerConfig;
use crate::n_plus_one::NPlusOneAnalyzer;

/// Trait for tree analyses.
pub trait Analysis {
    /// Analyze one file's tree and return findings.
    fn analyze(&self, program: &Program, config: &AnalyzerConfig) -> Vec<Issue>;

    /// Name of this analysis (for debugging/logging)
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Registry for managing multiple analyses
#[derive(Default)]
pub struct AnalysisRegistry {
    analyses: Vec<Box<dyn Analysis>>,
}

impl AnalysisRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an analysis to the registry
    pub fn add_analysis<A: Analysis + 'static>(mut self, analysis: A) -> Self {
        self.analyses.push(Box::new(analysis));
        self
    }

    /// Run all analyses over one file and collect findings
    pub fn run_all(&self, program: &Program, config: &AnalyzerConfig) -> IssueCollection {
        let mut collection = IssueCollection::new();
        for analysis in &self.analyses {
            let issues = analysis.analyze(program, config);
            tracing::debug!(analysis = analysis.name(), found = issues.len(), "analysis done");
            collection.extend(issues);
        }
        collection
    }

    /// Get the number of registered analyses
    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }
}

/// Create the default registry with the built-in analyses.
pub fn create_default_registry() -> AnalysisRegistry {
    AnalysisRegistry::new().add_analysis(NPlusOneAnalyzer)
}
