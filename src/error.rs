//! Error types for jsonxsd
//!
//! One error enum covers the whole render pipeline; conversion failures
//! carry the dotted path at which the mismatch was detected.

use std::fmt;
use thiserror::Error;

/// Result type alias using the jsonxsd Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for schema synthesis and conversion
#[derive(Error, Debug)]
pub enum Error {
    /// Input uses a feature the renderer does not support
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Union type with a non-primitive member
    #[error("unsupported union: {0}")]
    UnsupportedUnion(String),

    /// Document does not conform to the inferred type graph
    #[error("malformed input: {0}")]
    Malformed(#[from] ConversionError),

    /// An internal invariant was broken
    #[error("internal error: {0}")]
    Internal(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Conversion error with the path where detection occurred
#[derive(Debug, Clone)]
pub struct ConversionError {
    /// Error message
    pub message: String,
    /// Dotted tag path to the mismatching value
    pub path: Option<String>,
}

impl ConversionError {
    /// Create a new conversion error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    /// Set the path where conversion failed
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref path) = self.path {
            write!(f, " (at {})", path)?;
        }

        Ok(())
    }
}

impl std::error::Error for ConversionError {}

/// Shorthand for a malformed-input error at a path
pub fn malformed(message: impl Into<String>, path: &str) -> Error {
    Error::Malformed(ConversionError::new(message).with_path(path))
}
