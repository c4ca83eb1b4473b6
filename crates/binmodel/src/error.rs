//! Error type shared by the chunk codec and the schema model.

use binmodel_buffers::BufferError;
use thiserror::Error;

/// Errors raised while encoding or decoding chunks and records.
///
/// Every error aborts the whole operation; no partial output is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid value: expected {expected}, got {found}")]
    InvalidValue { expected: String, found: String },
    #[error("field \"{0}\" is required but was not defined or null")]
    RequiredFieldMissing(String),
    #[error("unsupported column type ({0})")]
    UnknownType(u8),
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },
    #[error("failed to read data chunk for field \"{0}\"")]
    TruncatedRecord(String),
    #[error("malformed chunk: {0}")]
    MalformedChunk(String),
    #[error("{0} trailing bytes after the last field")]
    TrailingBytes(usize),
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

impl Error {
    pub(crate) fn invalid_value(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Error::InvalidValue {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

impl From<BufferError> for Error {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer { needed, remaining } => {
                Error::TruncatedInput { needed, remaining }
            }
            BufferError::InvalidUtf8 => Error::MalformedChunk("invalid UTF-8".into()),
            BufferError::InvalidWidth(size) => Error::invalid_value(
                "an integer width between 1 and 8 bytes",
                format!("{size} bytes"),
            ),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
