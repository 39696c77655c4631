//! Error types shared by the evaluators, the NEH runner, and the batch runner.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for flow-shop operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while loading instances, evaluating sequences, or
/// running a batch.
#[derive(Error, Debug)]
pub enum Error {
    /// A file could not be opened, read, or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A processing-time or time-matrix file is malformed or truncated.
    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A job sequence was rejected by an evaluator.
    #[error("Invalid sequence: {0}")]
    Validation(#[from] ValidationError),

    /// A time matrix could not be allocated.
    #[error("Allocation failed for a {rows}x{cols} matrix")]
    Allocation { rows: usize, cols: usize },

    /// The run configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected internal state.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A rejected job sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of sequence validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The sequence has no jobs.
    EmptySequence,
    /// The sequence has more entries than the instance has jobs.
    SequenceTooLong,
    /// A job id lies outside `[1, total_jobs]`.
    JobOutOfRange,
    /// A job id appears more than once.
    DuplicateJob,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}
