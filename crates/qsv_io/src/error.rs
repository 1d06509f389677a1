//! Error type for file parsing and writing.

use thiserror::Error;

use qsv_core::error::QsvError;

/// Errors produced while reading or writing QSV file formats.
#[derive(Error, Debug)]
pub enum IoError {
    /// Underlying IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input at a specific line (1-indexed)
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Failure raised by the constructed circuit or state
    #[error(transparent)]
    Core(#[from] QsvError),
}

impl IoError {
    /// Creates a parse error for a 1-indexed line.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for QSV I/O operations.
pub type Result<T> = std::result::Result<T, IoError>;
