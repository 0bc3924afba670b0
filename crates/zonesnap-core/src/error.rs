//! Error types for the zone snapshot engine
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the zone snapshot engine
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (fatal before any I/O)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Object store errors, with the bucket/key that failed
    #[error("Store error (bucket {bucket}, key {}): {message}", .key.as_deref().unwrap_or("-"))]
    Store {
        /// Bucket the operation targeted
        bucket: String,
        /// Key the operation targeted, if key-level
        key: Option<String>,
        /// Error message
        message: String,
    },

    /// Zone source errors (listing or exporting zones)
    #[error("Zone source error: {0}")]
    ZoneSource(String),

    /// Notification delivery errors
    #[error("Notification error (recipient {recipient}): {message}")]
    Notify {
        /// Intended recipient
        recipient: String,
        /// Error message
        message: String,
    },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a bucket-level store error
    pub fn store(bucket: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Store {
            bucket: bucket.into(),
            key: None,
            message: msg.into(),
        }
    }

    /// Create a key-level store error
    pub fn store_key(
        bucket: impl Into<String>,
        key: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Store {
            bucket: bucket.into(),
            key: Some(key.into()),
            message: msg.into(),
        }
    }

    /// Create a zone source error
    pub fn zone_source(msg: impl Into<String>) -> Self {
        Self::ZoneSource(msg.into())
    }

    /// Create a notification error
    pub fn notify(recipient: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Notify {
            recipient: recipient.into(),
            message: msg.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
