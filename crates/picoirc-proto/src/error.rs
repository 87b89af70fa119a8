//! Protocol error types.

use thiserror::Error;

/// Errors produced while framing or decoding the wire protocol.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Underlying transport I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line exceeded the configured maximum length.
    #[error("line too long: {actual} bytes exceeds limit of {limit}")]
    LineTooLong { actual: usize, limit: usize },

    /// A line contained bytes that are not valid UTF-8.
    #[error("line is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Result alias used throughout the protocol crate.
pub type Result<T> = std::result::Result<T, ProtocolError>;
