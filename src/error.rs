//! Error types for the PDF library.
//!
//! This module defines all error types that can occur while building and
//! serializing a PDF object graph.

/// Result type alias for PDF library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during PDF generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error while writing to the output sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Structural inconsistency in the object graph (caller bug upstream)
    #[error("Illegal state: {0}")]
    IllegalState(String),

    /// Invalid argument rejected at construction time
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// Violation of the configured conformance profile
    #[error(transparent)]
    Conformance(#[from] ConformanceError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for an [`Error::IllegalState`].
    pub fn illegal_state(msg: impl Into<String>) -> Self {
        Error::IllegalState(msg.into())
    }

    /// Shorthand for an [`Error::IllegalArgument`].
    pub fn illegal_argument(msg: impl Into<String>) -> Self {
        Error::IllegalArgument(msg.into())
    }

    /// Whether this error was raised by a conformance check.
    pub fn is_conformance(&self) -> bool {
        matches!(self, Error::Conformance(_))
    }
}

/// A construct that is not allowed under the active profile.
///
/// These are user-configuration errors: the document cannot be produced
/// as requested and generation must stop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{profile} conformance violation: {message}")]
pub struct ConformanceError {
    /// Profile that was violated (e.g. "PDF/A-1b")
    pub profile: String,
    /// What was offending
    pub message: String,
}

impl ConformanceError {
    /// Create a new conformance error.
    pub fn new(profile: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            message: message.into(),
        }
    }
}
