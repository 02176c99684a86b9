//! # Tree decode boundary
//!
//! The producing parser runs out of process and hands trees over as JSON,
//! one document per file. Decoding is the only fallible operation in the
//! workspace: a malformed document means the producer-side contract was
//! broken, and the file is skipped by the driver.

use thiserror::Error;

use crate::ast::Program;

/// Failure to decode a producer-supplied tree document.
#[derive(Debug, Error)]
pub enum TreeDecodeError {
    #[error("malformed tree document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decode a file's tree from the producer's JSON dump.
pub fn program_from_json(input: &str) -> Result<Program, TreeDecodeError> {
    Ok(serde_json::from_str(input)?)
}
