//! Shared-secret material and the provider seam that supplies it.
//!
//! Signing and verification never read the secret from global state;
//! they take a [`SecretProvider`] so hosts can source keying material
//! from their settings store, a secrets manager, or the environment.

use std::fmt;

use crate::error::SignError;

/// Keying material for the token digest.
///
/// The `Debug` implementation redacts the material so secrets cannot
/// leak through logs.
#[derive(Clone)]
pub struct Secret(Vec<u8>);

impl Secret {
    /// Create a secret from raw bytes or a string.
    pub fn new(material: impl Into<Vec<u8>>) -> Self {
        Self(material.into())
    }

    /// Get the raw keying material.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Secret").field(&"..").finish()
    }
}

/// Source of the shared signing secret.
pub trait SecretProvider: Send + Sync {
    /// Return the current shared secret.
    ///
    /// # Errors
    /// Returns an error if no secret is available; signing degrades to
    /// an unsigned URL and verification fails closed.
    fn shared_secret(&self) -> Result<Secret, SignError>;
}

/// Provider holding a fixed secret in memory.
#[derive(Debug, Clone)]
pub struct StaticSecretProvider {
    secret: Secret,
}

impl StaticSecretProvider {
    /// Create a provider around fixed keying material.
    pub fn new(material: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: Secret::new(material),
        }
    }
}

impl SecretProvider for StaticSecretProvider {
    fn shared_secret(&self) -> Result<Secret, SignError> {
        Ok(self.secret.clone())
    }
}

/// Provider reading the secret from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvSecretProvider {
    var: String,
}

impl EnvSecretProvider {
    /// Environment variable read by [`EnvSecretProvider::new`].
    pub const DEFAULT_VAR: &str = "SECURL_SECRET";

    /// Create a provider reading [`Self::DEFAULT_VAR`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_var(Self::DEFAULT_VAR)
    }

    /// Create a provider reading the given environment variable.
    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretProvider for EnvSecretProvider {
    fn shared_secret(&self) -> Result<Secret, SignError> {
        match std::env::var(&self.var) {
            Ok(value) if !value.is_empty() => Ok(Secret::new(value)),
            _ => Err(SignError::SecretUnavailable(format!(
                "environment variable {} is not set",
                self.var
            ))),
        }
    }
}
