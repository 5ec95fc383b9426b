//! Error types for URL signing.

use thiserror::Error;

/// Errors that can occur while signing a URL.
///
/// Verification never surfaces these: every failure there collapses to
/// a plain rejection so callers cannot probe which check tripped.
#[derive(Debug, Error)]
pub enum SignError {
    /// The shared secret could not be obtained from its provider.
    #[error("shared secret unavailable: {0}")]
    SecretUnavailable(String),

    /// An engaged attribute binder failed to produce its pairs.
    #[error("attribute binder {flag:?} failed")]
    Binding {
        /// Wire name of the failing binder's flag.
        flag: String,
        /// Underlying binder error.
        #[source]
        source: anyhow::Error,
    },
}
