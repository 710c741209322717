//! Error types for docform.

use std::io;
use thiserror::Error;

/// Result type alias for docform operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An operation was given a structurally invalid argument.
    InvalidParameter,
    /// A valid operation could not complete against the actual data.
    ExecutionFailed,
    /// A data or byte transformer returned an error.
    TransformFailed,
    /// The cancellation signal fired during the render.
    Cancelled,
    /// Anything else (I/O, serialization, unknown format, encoder failure).
    Other,
}

/// Error types that can occur while building or rendering a document.
#[derive(Error, Debug)]
pub enum Error {
    /// An operation was given an invalid argument (null predicate, negative limit, ...).
    #[error("invalid parameter for {operation}: {message}")]
    InvalidParameter {
        /// Operation name (e.g. "filter", "sort")
        operation: &'static str,
        /// What was wrong
        message: String,
    },

    /// An otherwise valid operation failed against the table data.
    #[error("{operation} failed: {message}")]
    ExecutionFailed {
        /// Operation name
        operation: &'static str,
        /// What went wrong
        message: String,
    },

    /// A transformer returned an error.
    #[error("transformer '{transformer}' failed for format '{format}' on {target}: {source}")]
    TransformFailed {
        /// Name of the failing transformer
        transformer: String,
        /// Format being rendered
        format: String,
        /// The content or byte state that was being transformed
        target: String,
        /// The error returned by the transformer
        source: Box<Error>,
    },

    /// The render was abandoned because the cancellation signal fired.
    #[error("render cancelled")]
    Cancelled,

    /// No renderer is registered for the requested format.
    #[error("unknown output format: {0}")]
    UnknownFormat(String),

    /// An encoder could not produce output for a content item.
    #[error("{format} rendering error: {message}")]
    Render {
        /// Format being rendered
        format: String,
        /// What went wrong
        message: String,
    },

    /// I/O error when writing rendered output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for an [`Error::InvalidParameter`].
    pub fn invalid_parameter(operation: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            operation,
            message: message.into(),
        }
    }

    /// Shorthand for an [`Error::ExecutionFailed`].
    pub fn execution_failed(operation: &'static str, message: impl Into<String>) -> Self {
        Error::ExecutionFailed {
            operation,
            message: message.into(),
        }
    }

    /// Shorthand for an [`Error::Render`].
    pub fn render(format: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Render {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Get the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Error::ExecutionFailed { .. } => ErrorKind::ExecutionFailed,
            Error::TransformFailed { .. } => ErrorKind::TransformFailed,
            Error::Cancelled => ErrorKind::Cancelled,
            _ => ErrorKind::Other,
        }
    }

    /// Check if the render was abandoned rather than broken.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    /// Name of the transformer that failed, if this is a transform failure.
    pub fn transformer(&self) -> Option<&str> {
        match self {
            Error::TransformFailed { transformer, .. } => Some(transformer),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Cancelled;
        assert_eq!(err.to_string(), "render cancelled");

        let err = Error::invalid_parameter("limit", "count must be >= 0, got -1");
        assert_eq!(
            err.to_string(),
            "invalid parameter for limit: count must be >= 0, got -1"
        );
    }

    #[test]
    fn test_transform_failed_display() {
        let err = Error::TransformFailed {
            transformer: "redact".into(),
            format: "html".into(),
            target: "12 bytes".into(),
            source: Box::new(Error::Other("boom".into())),
        };
        assert_eq!(
            err.to_string(),
            "transformer 'redact' failed for format 'html' on 12 bytes: boom"
        );
        assert_eq!(err.kind(), ErrorKind::TransformFailed);
        assert_eq!(err.transformer(), Some("redact"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::execution_failed("sort", "x").kind(),
            ErrorKind::ExecutionFailed
        );
        assert!(Error::Cancelled.is_cancelled());
        assert_eq!(Error::UnknownFormat("yaml".into()).kind(), ErrorKind::Other);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
