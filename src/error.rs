//! Error types.
//!
//! Only construction errors reach callers. Serialization and sink failures
//! are recovered inside the logger and reported through diagnostics.

use std::io;

use thiserror::Error;

/// A field serializer could not produce a JSON-safe value.
#[derive(Debug, Clone, Error)]
#[error("serializer for `{field}` failed: {reason}")]
pub struct SerializationError {
    pub field: String,
    pub reason: String,
}

impl SerializationError {
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// A sink could not accept a write.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink was closed before the write.
    #[error("sink is closed")]
    Closed,

    /// The underlying destination failed.
    #[error("sink I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors raised while building a logger.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// Generic invalid configuration.
    #[error("invalid logger configuration: {0}")]
    Configuration(String),

    /// A level name or number that is not a known severity.
    #[error("unknown log level: {0:?}")]
    InvalidLevel(String),

    /// Two streams were configured with the same identity.
    #[error("duplicate stream id: {0}")]
    DuplicateStream(String),

    /// A configured sink could not be opened.
    #[error("failed to open sink {target}: {source}")]
    SinkOpen {
        target: String,
        #[source]
        source: io::Error,
    },

    /// A serialized logger spec could not be parsed.
    #[error("invalid logger spec: {0}")]
    Spec(#[from] serde_json::Error),
}

/// A JSON line could not be read back as a record.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty line")]
    Empty,

    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SerializationError::new("err", "boom");
        assert_eq!(err.to_string(), "serializer for `err` failed: boom");

        let err = LoggerError::DuplicateStream("stderr".to_string());
        assert_eq!(err.to_string(), "duplicate stream id: stderr");

        let err = SinkError::from(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert!(err.to_string().contains("disk full"));
    }
}
