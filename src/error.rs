// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the classification pipeline.
///
/// Every variant is fatal for the computation that raised it. Nothing in the
/// library retries or swallows these.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("malformed record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },

    #[error("insufficient class diversity for {context}: both training classes must be present")]
    InsufficientClassDiversity { context: String },

    #[error("degenerate training set: found {distinct} distinct label(s), need 2")]
    DegenerateTrainingSet { distinct: usize },

    #[error("model queried before it was fitted")]
    NotFitted,

    #[error("cannot fit on an empty matrix")]
    EmptyInput,

    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("margin solver failed: {0}")]
    Solver(String),

    #[error("binary target must be 0 or 1, found {0}")]
    InvalidLabel(usize),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ClassifyResult<T> = std::result::Result<T, ClassifyError>;
