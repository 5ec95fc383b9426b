//! Expiry instants carried in signed URLs.
//!
//! The `ttl` parameter holds the absolute Unix second after which a
//! link should no longer be honored. Signing covers the value, so a
//! shifted expiry invalidates the token; whether an expired link is
//! still served is the host's decision, made after verification.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};

use crate::error::{SecurlError, SecurlResult};

/// Expiry instant of a signed URL, in Unix seconds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct Expiry(i64);

impl Expiry {
    /// Reserved query parameter carrying the expiry.
    pub const PARAM: &str = "ttl";

    /// Create an expiry from an absolute Unix second.
    #[must_use]
    pub const fn from_unix(secs: i64) -> Self {
        Self(secs)
    }

    /// Create an expiry the given number of seconds from now.
    #[must_use]
    pub fn after(secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        Self(Utc::now().timestamp().saturating_add(secs))
    }

    /// Get the expiry as an absolute Unix second.
    #[must_use]
    pub const fn as_unix(self) -> i64 {
        self.0
    }

    /// Encode the expiry into its wire form, a decimal Unix second.
    ///
    /// # Examples
    /// ```
    /// use securl_core::Expiry;
    ///
    /// assert_eq!(Expiry::from_unix(1_700_000_000).encode(), "1700000000");
    /// ```
    #[must_use]
    pub fn encode(self) -> String {
        self.0.to_string()
    }

    /// Decode an expiry from its wire form.
    ///
    /// # Errors
    /// Returns an error if the value is not a decimal Unix second.
    pub fn decode(value: &str) -> SecurlResult<Self> {
        value
            .parse::<i64>()
            .map(Self)
            .map_err(|_| SecurlError::InvalidExpiry(value.to_owned()))
    }

    /// Decode an expiry from the legacy base64 wire form, a standard
    /// base64 encoding of the decimal Unix second.
    ///
    /// # Errors
    /// Returns an error if the value is not base64, or if the decoded
    /// text is not a decimal Unix second.
    pub fn from_base64(value: &str) -> SecurlResult<Self> {
        let bytes = STANDARD
            .decode(value)
            .map_err(|_| SecurlError::InvalidExpiry(value.to_owned()))?;
        let text =
            String::from_utf8(bytes).map_err(|_| SecurlError::InvalidExpiry(value.to_owned()))?;
        Self::decode(text.trim())
    }

    /// Whether the expiry has passed at the given instant. The link is
    /// still usable during the expiry second itself.
    #[must_use]
    pub fn is_expired_at(self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.0
    }

    /// Whether the expiry has passed.
    #[must_use]
    pub fn is_expired(self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
