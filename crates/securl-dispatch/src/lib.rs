//! Storefront integration for securl signed download URLs.
//!
//! This crate wires the signing core into a storefront's download
//! pipeline through two hook surfaces: URL construction (verbose
//! arguments in, signed compact URL out) and pre-dispatch verification
//! (compact URL in, rewritten dispatch arguments or an invalid signal
//! out). The storefront supplies its payment records through the
//! [`PaymentStore`] seam and its HTTP request attributes through
//! [`PartsContext`].
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use securl_core::{DownloadId, FileKey, PaymentId, SecurlConfig};
//! use securl_dispatch::{
//!     DispatchOutcome, LinkRequest, PaymentMetadata, SecureLinks, StaticPaymentStore,
//! };
//! use securl_sign::{StaticContext, StaticSecretProvider};
//!
//! let payments = StaticPaymentStore::new().with(
//!     PaymentId::new(42),
//!     PaymentMetadata::new("buyer@example.com", "abc123"),
//! );
//! let service = SecureLinks::new(
//!     SecurlConfig::default(),
//!     Arc::new(StaticSecretProvider::new("shop-secret")),
//!     Arc::new(payments),
//! );
//!
//! let request = LinkRequest::builder()
//!     .base_url("/download")
//!     .purchase_key("abc123")
//!     .download_id(DownloadId::new(7))
//!     .file_key(FileKey::from_index(3))
//!     .build();
//! let context = StaticContext::default();
//! let url = service.build_url(&request, &context).unwrap();
//!
//! assert!(matches!(
//!     service.process(&url, &context),
//!     DispatchOutcome::Verified(_)
//! ));
//! ```
//!
//! # Modules
//!
//! - [`context`] - Request context backed by HTTP request parts
//! - [`links`] - The URL-construction and pre-dispatch hooks
//! - [`payment`] - Payment store seam and in-memory implementation

pub mod context;
pub mod links;
pub mod payment;

pub use context::PartsContext;
pub use links::{DispatchArgs, DispatchOutcome, LinkRequest, SecureLinks};
pub use payment::{PaymentMetadata, PaymentStore, StaticPaymentStore};
