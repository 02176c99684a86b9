//! # lazylint analyzer
//!
//! Flow-sensitive detection of N+1 access patterns over a pre-parsed
//! syntax tree: relationships lazily loaded inside loops without a prior
//! bulk pre-load, and queries executed inside loops with loop-dependent
//! parameters.
//!
//! The engine runs one synchronous depth-first pass per file and keeps no
//! state across files, so a driver may analyze many files concurrently
//! with no coordination — each [`analyze`] call builds fresh trackers and
//! discards them with the result.
//!
//! ```
//! use lazylint_syntax::program_from_json;
//!
//! let program = program_from_json(r#"{"statements": []}"#)?;
//! let issues = lazylint_analyzer::analyze(&program);
//! assert!(issues.is_empty());
//! # Ok::<(), lazylint_syntax::TreeDecodeError>(())
//! ```

pub mod analysis;
pub mod chain;
pub mod classify;
pub mod collector;
pub mod config;
pub mod context;
pub mod deferred;
pub mod dependency;
pub mod n_plus_one;
pub mod provenance;

use lazylint_diagnostics::IssueCollection;
use lazylint_syntax::Program;

pub use analysis::{create_default_registry, Analysis, AnalysisRegistry};
pub use config::{AnalyzerConfig, COMPLEX_CHAIN_CALL_COUNT};
pub use n_plus_one::NPlusOneAnalyzer;

/// Analyze one file's tree with the default configuration.
pub fn analyze(program: &Program) -> IssueCollection {
    analyze_with_config(program, &AnalyzerConfig::default())
}

/// Analyze one file's tree.
pub fn analyze_with_config(program: &Program, config: &AnalyzerConfig) -> IssueCollection {
    create_default_registry().run_all(program, config)
}
