//! Error types for the fuelog-core library.

use thiserror::Error;

/// Main error type for the fuelog library.
#[derive(Error, Debug)]
pub enum FuelogError {
    /// Receipt extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Row sink error.
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to receipt field extraction.
///
/// Individual fields that cannot be matched are not errors; they come back
/// as absent values on the record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The receipt text is empty or contains only whitespace.
    #[error("receipt text is empty")]
    EmptyInput,
}

/// Errors raised by row sinks.
#[derive(Error, Debug)]
pub enum SinkError {
    /// The sink could not be opened or created.
    #[error("failed to open sink: {0}")]
    Open(String),

    /// Appending a row failed.
    #[error("failed to append row: {0}")]
    Append(String),

    /// Reading previously logged rows failed.
    #[error("failed to read sink history: {0}")]
    History(String),

    /// The row does not match the sink's column layout.
    #[error("row has {found} columns, sink expects {expected}")]
    ColumnMismatch { expected: usize, found: usize },
}

/// Result type for the fuelog library.
pub type Result<T> = std::result::Result<T, FuelogError>;
