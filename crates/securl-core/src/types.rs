//! Identifier types shared across the securl crates.

use std::fmt;

use crate::descriptor::DESCRIPTOR_DELIMITER;
use crate::error::{SecurlError, SecurlResult};

/// Identifier of a completed payment record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct PaymentId(u64);

impl PaymentId {
    /// Create a payment identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the numeric identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a downloadable product.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct DownloadId(u64);

impl DownloadId {
    /// Create a download identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the numeric identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DownloadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of one file within a download, usually its index in the
/// product's file list.
///
/// File keys travel inside the packed download descriptor, so they may
/// not be empty and may not contain the descriptor delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FileKey(String);

impl FileKey {
    /// Create a file key from a string.
    ///
    /// # Errors
    /// Returns an error if the key is empty or contains `':'`.
    pub fn new(key: impl Into<String>) -> SecurlResult<Self> {
        let key = key.into();
        if key.is_empty() || key.contains(DESCRIPTOR_DELIMITER) {
            return Err(SecurlError::InvalidFileKey(key));
        }
        Ok(Self(key))
    }

    /// Create a file key from a numeric file-list index.
    #[must_use]
    pub fn from_index(index: u64) -> Self {
        Self(index.to_string())
    }

    /// Get the file key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
