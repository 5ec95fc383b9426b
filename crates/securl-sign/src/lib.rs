//! Tamper-evident signing and verification for download URLs.
//!
//! This crate implements the protocol core of securl: a keyed digest
//! over the canonical form of a URL, carried as its final `token`
//! parameter. Any change to the path or parameters invalidates the
//! token, and URLs can additionally be bound to hidden attributes of
//! the requesting client (network address, user agent) that never
//! appear in the URL itself.
//!
//! # Overview
//!
//! Signing and verification are free functions over three injected
//! collaborators: a [`SecretProvider`] supplying the shared key, a
//! [`RequestContext`] exposing the current request's attributes, and a
//! [`BinderRegistry`] holding the attribute binders a host has engaged.
//! Verification returns a bare boolean; rejection reasons are logged
//! but never surfaced.
//!
//! # Usage
//!
//! ```rust
//! use securl_sign::{BinderRegistry, SigningRequest, StaticContext, StaticSecretProvider};
//! use securl_sign::{sign, verify};
//!
//! let secrets = StaticSecretProvider::new("shop-secret");
//! let context = StaticContext::default();
//! let binders = BinderRegistry::new();
//!
//! let request = SigningRequest::new("/download")
//!     .param("eddfile", "42:7:3")
//!     .param("ttl", "1700000000");
//! let url = sign(&request, &secrets, &context, &binders).unwrap().into_url();
//!
//! assert!(verify(&url, &secrets, &context, &binders));
//! assert!(!verify(&url.replace("42%3A7%3A3", "42%3A7%3A4"), &secrets, &context, &binders));
//! ```
//!
//! # Modules
//!
//! - [`binding`] - Attribute binders and the `o` flag list
//! - [`canonical`] - Canonical digest-input construction
//! - [`context`] - Request attributes seen by binders
//! - [`error`] - Signing error types
//! - [`secret`] - Shared-secret providers
//! - [`token`] - Token computation, signing, and verification

pub mod binding;
pub mod canonical;
pub mod context;
pub mod error;
pub mod secret;
pub mod token;

pub use binding::{AttributeBinder, BinderRegistry, ClientIpBinder, OptionFlag, UserAgentBinder};
pub use context::{RequestContext, StaticContext};
pub use error::SignError;
pub use secret::{EnvSecretProvider, Secret, SecretProvider, StaticSecretProvider};
pub use token::{SignedUrl, SigningRequest, Token, sign, verify};
