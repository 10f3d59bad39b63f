//! Shared error types for evaluation.

use std::io;

/// Errors that can occur while evaluating a prediction file.
///
/// Arithmetic degeneracies (zero denominators, empty folds) are not errors;
/// they surface as NaN / `None` values. Only structural problems raise.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("shape mismatch: expected {expected} scores, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cannot parse experiment metadata: {0}")]
    Metadata(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
