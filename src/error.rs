//! Error types for the Shukuyaku library.
//!
//! All fallible operations return [`ShukuyakuError`]. The variants follow the
//! lifecycle of a dictionary: fetching the source, persisting a compiled
//! dictionary, and serving optimization requests against it.
//!
//! A malformed line in the dictionary source is *not* an error. The parser
//! skips it and counts it in the build report.
//!
//! # Examples
//!
//! ```
//! use shukuyaku::error::{Result, ShukuyakuError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ShukuyakuError::invalid_request("Text is required"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Shukuyaku operations.
#[derive(Error, Debug)]
pub enum ShukuyakuError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The raw dictionary source could not be retrieved.
    #[error("Source fetch error: {0}")]
    SourceFetch(String),

    /// A storage batch failed after exhausting its retries.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// An optimization was requested before any dictionary was built or loaded.
    #[error("Dictionary is not initialized: {0}")]
    UninitializedDictionary(String),

    /// The caller sent a request that cannot be processed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Analysis-related errors (tokenization, token counting)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with ShukuyakuError.
pub type Result<T> = std::result::Result<T, ShukuyakuError>;

impl ShukuyakuError {
    /// Create a new source fetch error.
    pub fn source_fetch<S: Into<String>>(msg: S) -> Self {
        ShukuyakuError::SourceFetch(msg.into())
    }

    /// Create a new persistence error.
    pub fn persistence<S: Into<String>>(msg: S) -> Self {
        ShukuyakuError::Persistence(msg.into())
    }

    /// Create a new uninitialized dictionary error.
    pub fn uninitialized<S: Into<String>>(msg: S) -> Self {
        ShukuyakuError::UninitializedDictionary(msg.into())
    }

    /// Create a new invalid request error.
    pub fn invalid_request<S: Into<String>>(msg: S) -> Self {
        ShukuyakuError::InvalidRequest(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        ShukuyakuError::Storage(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        ShukuyakuError::Analysis(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ShukuyakuError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ShukuyakuError::Other(msg.into())
    }

    /// Whether the error was caused by the caller rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ShukuyakuError::InvalidRequest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = ShukuyakuError::source_fetch("HTTP status 404");
        assert_eq!(error.to_string(), "Source fetch error: HTTP status 404");

        let error = ShukuyakuError::persistence("batch 3 failed");
        assert_eq!(error.to_string(), "Persistence error: batch 3 failed");

        let error = ShukuyakuError::invalid_request("Text is required");
        assert_eq!(error.to_string(), "Invalid request: Text is required");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(ShukuyakuError::invalid_request("empty").is_client_error());
        assert!(!ShukuyakuError::uninitialized("no build yet").is_client_error());
        assert!(!ShukuyakuError::source_fetch("timeout").is_client_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = ShukuyakuError::from(io_error);

        match error {
            ShukuyakuError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
