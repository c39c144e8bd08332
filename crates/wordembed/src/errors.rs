//! # Error Types

/// Errors from wordembed operations.
#[derive(Debug, thiserror::Error)]
pub enum WordembedError {
    /// The section ended before a field could be read.
    #[error("unexpected end of data at offset {offset}: {needed} more bytes needed")]
    UnexpectedEof {
        /// Byte offset of the field which could not be read.
        offset: usize,

        /// The number of bytes the field required.
        needed: usize,
    },

    /// A dictionary word was not valid UTF-8.
    #[error("invalid utf-8 word at offset {offset}")]
    InvalidUtf8 {
        /// Byte offset of the word payload.
        offset: usize,
    },

    /// Structurally invalid embedding data.
    #[error("malformed embedding: {0}")]
    Malformed(String),

    /// The number of rows does not fit the id type.
    #[error("id space ({rows} rows) exceeds id type capacity")]
    IdOverflow {
        /// The row count that exceeded the capacity.
        rows: usize,
    },

    /// Composed rows carry updates which have not been flushed.
    #[error("{active} composed rows have unflushed updates")]
    PendingUpdates {
        /// The number of active composed rows.
        active: usize,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Parse error (floats, table lines, etc.)
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for wordembed operations.
pub type WEResult<T> = core::result::Result<T, WordembedError>;
