//! Configuration for signed download URLs.
//!
//! Configuration values are loaded from environment variables so hosts
//! can tune link lifetime and client binding without code changes.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Default link lifetime: one day.
pub const DEFAULT_LINK_TTL_SECS: u64 = 86_400;

/// Signed-URL configuration.
///
/// All fields have defaults. Configuration can be loaded from
/// environment variables via [`SecurlConfig::from_env`].
///
/// # Examples
///
/// ```
/// use securl_core::SecurlConfig;
///
/// let config = SecurlConfig::default();
/// assert_eq!(config.link_ttl_secs, 86_400);
/// assert!(!config.bind_client_ip);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct SecurlConfig {
    /// Lifetime of issued links, in seconds, when no explicit expiry is
    /// supplied.
    #[builder(default = DEFAULT_LINK_TTL_SECS)]
    pub link_ttl_secs: u64,

    /// Whether issued links are bound to the requesting client's
    /// network address.
    #[builder(default = false)]
    pub bind_client_ip: bool,

    /// Whether issued links are bound to the requesting client's
    /// user-agent string.
    #[builder(default = false)]
    pub bind_user_agent: bool,
}

impl Default for SecurlConfig {
    fn default() -> Self {
        Self {
            link_ttl_secs: DEFAULT_LINK_TTL_SECS,
            bind_client_ip: false,
            bind_user_agent: false,
        }
    }
}

impl SecurlConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables (falling back to defaults):
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `SECURL_LINK_TTL_SECS` | `86400` |
    /// | `SECURL_BIND_CLIENT_IP` | `false` |
    /// | `SECURL_BIND_USER_AGENT` | `false` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("SECURL_LINK_TTL_SECS") {
            if let Ok(n) = v.parse::<u64>() {
                config.link_ttl_secs = n;
            }
        }
        if let Ok(v) = std::env::var("SECURL_BIND_CLIENT_IP") {
            config.bind_client_ip = parse_bool(&v);
        }
        if let Ok(v) = std::env::var("SECURL_BIND_USER_AGENT") {
            config.bind_user_agent = parse_bool(&v);
        }

        config
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
