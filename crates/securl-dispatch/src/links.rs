//! The two hook surfaces a storefront wires securl into.
//!
//! [`SecureLinks::build_url`] sits on the storefront's URL-construction
//! path: it resolves the verbose download arguments to the compact
//! signed form, or leaves the URL alone when signing is impossible.
//! [`SecureLinks::process`] sits ahead of download dispatch: it detects
//! compact parameters, verifies the token, and rewrites the dispatch
//! arguments from the storefront's own records. A request that carries
//! compact parameters but fails any check is reported as invalid and
//! must not be served.

use std::fmt;
use std::sync::Arc;

use securl_core::{DownloadDescriptor, DownloadId, Expiry, FileKey, SecurlConfig};
use securl_sign::canonical::{parse_query, split_url};
use securl_sign::{
    AttributeBinder, BinderRegistry, ClientIpBinder, RequestContext, SecretProvider,
    SigningRequest, UserAgentBinder, sign, verify,
};
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

use crate::payment::PaymentStore;

/// Verbose download arguments handed to the URL-construction hook.
#[derive(Debug, Clone, TypedBuilder)]
pub struct LinkRequest {
    /// Endpoint the link points at; may carry scheme, host, and an
    /// existing query string.
    #[builder(setter(into))]
    pub base_url: String,

    /// Verbose purchase key identifying the payment.
    #[builder(setter(into))]
    pub purchase_key: String,

    /// Download the file belongs to.
    pub download_id: DownloadId,

    /// File being fetched.
    pub file_key: FileKey,

    /// Explicit expiry; the configured TTL applies when absent.
    #[builder(default)]
    pub expiry: Option<Expiry>,
}

/// Dispatch arguments rewritten from a verified compact URL.
///
/// The purchaser details come from the payment store, never from the
/// URL, so downstream code receives data the storefront vouches for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchArgs {
    /// Decoded download descriptor.
    pub descriptor: DownloadDescriptor,
    /// Email of the purchaser, from the payment record.
    pub email: String,
    /// Verbose purchase key, from the payment record.
    pub purchase_key: String,
    /// Expiry carried by the URL. Enforcement is the host's decision.
    pub expiry: Expiry,
}

/// Outcome of the pre-dispatch verification hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Compact parameters were present and every check passed.
    Verified(DispatchArgs),
    /// The request carries no compact parameters; the verbose flow
    /// applies untouched.
    Passthrough,
    /// Compact parameters were present but the request failed
    /// verification. It must not be served.
    Invalid,
}

/// Signed-download-URL service for one storefront.
///
/// Owns the collaborator wiring: the shared-secret provider, the
/// payment store, and the binder registry derived from configuration.
/// Binders registered here are engaged on every URL the service builds
/// and replayed on every URL it verifies.
pub struct SecureLinks {
    config: SecurlConfig,
    secrets: Arc<dyn SecretProvider>,
    payments: Arc<dyn PaymentStore>,
    binders: BinderRegistry,
}

impl SecureLinks {
    /// Create the service, engaging the built-in binders the
    /// configuration asks for.
    #[must_use]
    pub fn new(
        config: SecurlConfig,
        secrets: Arc<dyn SecretProvider>,
        payments: Arc<dyn PaymentStore>,
    ) -> Self {
        let mut binders = BinderRegistry::new();
        if config.bind_client_ip {
            binders.register(ClientIpBinder);
        }
        if config.bind_user_agent {
            binders.register(UserAgentBinder);
        }
        Self {
            config,
            secrets,
            payments,
            binders,
        }
    }

    /// Returns the service configuration.
    #[must_use]
    pub fn config(&self) -> &SecurlConfig {
        &self.config
    }

    /// Register a host-defined binder at the end of the engagement
    /// order. The same binder must be registered wherever the URLs are
    /// verified.
    pub fn register_binder(&mut self, binder: impl AttributeBinder + 'static) {
        self.binders.register(binder);
    }

    /// Build a signed compact URL for the given verbose arguments.
    ///
    /// Returns `None` when the purchase key resolves to no payment or
    /// when signing fails; the caller keeps its original unsigned URL.
    /// Failures are logged, never raised, so link rendering cannot take
    /// the page down.
    #[must_use]
    pub fn build_url(&self, request: &LinkRequest, context: &dyn RequestContext) -> Option<String> {
        let Some(payment_id) = self.payments.payment_id_by_key(&request.purchase_key) else {
            debug!(
                purchase_key = %request.purchase_key,
                "no payment for purchase key, leaving url unsigned"
            );
            return None;
        };
        let descriptor =
            DownloadDescriptor::new(payment_id, request.download_id, request.file_key.clone());
        let expiry = request
            .expiry
            .unwrap_or_else(|| Expiry::after(self.config.link_ttl_secs));

        let mut signing = SigningRequest::new(request.base_url.as_str())
            .param(DownloadDescriptor::PARAM, descriptor.encode())
            .param(Expiry::PARAM, expiry.encode());
        for flag in self.binders.flags() {
            signing = signing.option(flag);
        }

        match sign(&signing, self.secrets.as_ref(), context, &self.binders) {
            Ok(signed) => Some(signed.into_url()),
            Err(error) => {
                warn!(%error, "url signing failed, leaving url unsigned");
                None
            }
        }
    }

    /// Inspect a request URL ahead of download dispatch.
    ///
    /// URLs without the compact `eddfile` parameter pass through to the
    /// verbose flow. URLs carrying it are verified against the current
    /// request context; on success the dispatch arguments are rewritten
    /// from the decoded descriptor and the payment record.
    #[must_use]
    pub fn process(&self, url: &str, context: &dyn RequestContext) -> DispatchOutcome {
        let (_, query) = split_url(url);
        let params = query.map(parse_query).unwrap_or_default();
        let Some(packed) = param(&params, DownloadDescriptor::PARAM) else {
            return DispatchOutcome::Passthrough;
        };

        if !verify(url, self.secrets.as_ref(), context, &self.binders) {
            return DispatchOutcome::Invalid;
        }

        // The token proved integrity; anything unparseable past this
        // point means the signer itself issued a bad link.
        let Ok(descriptor) = DownloadDescriptor::decode(packed) else {
            warn!(packed, "verified url carries an unparseable descriptor");
            return DispatchOutcome::Invalid;
        };
        let Some(ttl) = param(&params, Expiry::PARAM) else {
            return DispatchOutcome::Invalid;
        };
        let Ok(expiry) = Expiry::decode(ttl) else {
            warn!(ttl, "verified url carries an unparseable expiry");
            return DispatchOutcome::Invalid;
        };
        let Some(metadata) = self.payments.payment_metadata(descriptor.payment_id) else {
            debug!(
                payment_id = %descriptor.payment_id,
                "no payment record behind verified url"
            );
            return DispatchOutcome::Invalid;
        };

        DispatchOutcome::Verified(DispatchArgs {
            descriptor,
            email: metadata.email,
            purchase_key: metadata.purchase_key,
            expiry,
        })
    }
}

impl fmt::Debug for SecureLinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureLinks")
            .field("config", &self.config)
            .field("binders", &self.binders)
            .field("secrets", &"..")
            .field("payments", &"..")
            .finish()
    }
}

/// First value of the named parameter, if present.
fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(n, _)| n.as_str() == name)
        .map(|(_, value)| value.as_str())
}
