// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, identifying and analysing a capture.
///
/// Short data rows and missing anatomical roles are not errors. They leave
/// zero-filled samples or a zeroed angle side and are reported through
/// `tracing`.
#[derive(Debug, Error)]
pub enum MocapError {
    /// The capture file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// No line starting with `Frame<TAB>` was found.
    #[error("no 'Frame<TAB>' column header line found in {}", path.display())]
    MalformedHeader { path: PathBuf },

    /// A coordinate field is present but is not a number.
    #[error("invalid value '{value}' in data row {row}, column {column}")]
    InvalidValue {
        row: usize,
        column: usize,
        value: String,
    },

    /// The capture has no data rows, so marker means are undefined.
    #[error("capture {} contains no frames", path.display())]
    EmptyCapture { path: PathBuf },

    /// Not enough (or inconsistent) samples for a fit.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type MocapResult<T> = Result<T, MocapError>;
