//! Analyzer configuration.

/// Chains with at least this many calls are described as complex.
///
/// Inherited from the analyzer this engine generalizes; override through
/// [`AnalyzerConfig`] rather than editing the constant.
pub const COMPLEX_CHAIN_CALL_COUNT: usize = 3;

/// Tunables for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Minimum call count at which a query chain is worded as complex.
    pub complex_chain_threshold: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            complex_chain_threshold: COMPLEX_CHAIN_CALL_COUNT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold_matches_constant() {
        assert_eq!(
            AnalyzerConfig::default().complex_chain_threshold,
            COMPLEX_CHAIN_CALL_COUNT
        );
    }
}
