//! Core types, configuration, and wire codecs for securl.
//!
//! securl issues tamper-evident, optionally client-bound download URLs
//! for digital storefronts. This crate holds the pieces the signing and
//! dispatch layers share: the identifier newtypes, the packed download
//! descriptor carried under `eddfile`, the expiry carried under `ttl`,
//! and the host-facing configuration.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven signing configuration
//! - [`descriptor`] - Packed `payment:download:file_key` descriptor codec
//! - [`error`] - Core error types
//! - [`expiry`] - Expiry instants and their wire forms
//! - [`types`] - Payment, download, and file-key identifiers

pub mod config;
pub mod descriptor;
pub mod error;
pub mod expiry;
pub mod types;

pub use config::{DEFAULT_LINK_TTL_SECS, SecurlConfig};
pub use descriptor::{DESCRIPTOR_DELIMITER, DownloadDescriptor};
pub use error::{SecurlError, SecurlResult};
pub use expiry::Expiry;
pub use types::{DownloadId, FileKey, PaymentId};
