//! Error types shared across the securl crates.

use thiserror::Error;

/// Errors produced by the core identifiers and wire codecs.
#[derive(Debug, Error)]
pub enum SecurlError {
    /// A file key was empty or contained the descriptor delimiter.
    #[error("invalid file key {0:?}: must be non-empty and must not contain ':'")]
    InvalidFileKey(String),

    /// A download descriptor did not pack exactly payment, download, and
    /// file key parts of the expected shapes.
    #[error("malformed download descriptor {0:?}")]
    MalformedDescriptor(String),

    /// An expiry value was not a decimal Unix timestamp, nor a legacy
    /// base64 rendition of one.
    #[error("invalid expiry value {0:?}")]
    InvalidExpiry(String),
}

/// Result alias for core operations.
pub type SecurlResult<T> = Result<T, SecurlError>;
