
//! Error taxonomy for the comparison engine.
//!
//! Only contract violations are surfaced as errors: invalid parameters and
//! attempts to compare MinHash signatures from different families. Data
//! insufficiency (empty gene lists, zero reference sketches, sequences too
//! short to window) is absorbed into empty results, and cancellation is
//! reported through a status flag on the affected analysis.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("incompatible signatures: {left} vs {right}")]
    IncompatibleSignatures { left: String, right: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
