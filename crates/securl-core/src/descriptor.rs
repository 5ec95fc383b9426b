//! Packed download descriptor carried in signed URLs.
//!
//! Verbose storefront links identify a download by several parameters
//! (purchase key, download id, file index). Signed URLs compress that
//! into one colon-delimited descriptor, `payment:download:file_key`,
//! carried under the reserved `eddfile` parameter.

use std::fmt;
use std::str::FromStr;

use crate::error::{SecurlError, SecurlResult};
use crate::types::{DownloadId, FileKey, PaymentId};

/// Delimiter between the packed descriptor parts.
pub const DESCRIPTOR_DELIMITER: char = ':';

/// A packed reference to one file of one download under one payment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DownloadDescriptor {
    /// Payment the link was issued against.
    pub payment_id: PaymentId,
    /// Download the file belongs to.
    pub download_id: DownloadId,
    /// File being fetched.
    pub file_key: FileKey,
}

impl DownloadDescriptor {
    /// Reserved query parameter carrying the packed descriptor.
    pub const PARAM: &str = "eddfile";

    /// Create a descriptor from its parts.
    #[must_use]
    pub const fn new(payment_id: PaymentId, download_id: DownloadId, file_key: FileKey) -> Self {
        Self {
            payment_id,
            download_id,
            file_key,
        }
    }

    /// Pack the descriptor into its wire form.
    ///
    /// # Examples
    /// ```
    /// use securl_core::{DownloadDescriptor, DownloadId, FileKey, PaymentId};
    ///
    /// let descriptor = DownloadDescriptor::new(
    ///     PaymentId::new(42),
    ///     DownloadId::new(7),
    ///     FileKey::from_index(3),
    /// );
    /// assert_eq!(descriptor.encode(), "42:7:3");
    /// ```
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{}:{}:{}", self.payment_id, self.download_id, self.file_key)
    }

    /// Unpack a descriptor from its wire form.
    ///
    /// # Errors
    /// Returns an error if the value does not hold exactly three
    /// delimited parts, or if the identifier parts are not numeric.
    pub fn decode(value: &str) -> SecurlResult<Self> {
        let parts: Vec<&str> = value.split(DESCRIPTOR_DELIMITER).collect();
        let [payment, download, file_key] = parts.as_slice() else {
            return Err(SecurlError::MalformedDescriptor(value.to_owned()));
        };
        let payment_id = payment
            .parse::<u64>()
            .map_err(|_| SecurlError::MalformedDescriptor(value.to_owned()))?;
        let download_id = download
            .parse::<u64>()
            .map_err(|_| SecurlError::MalformedDescriptor(value.to_owned()))?;
        Ok(Self {
            payment_id: PaymentId::new(payment_id),
            download_id: DownloadId::new(download_id),
            file_key: FileKey::new(*file_key)?,
        })
    }
}

impl fmt::Display for DownloadDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for DownloadDescriptor {
    type Err = SecurlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
