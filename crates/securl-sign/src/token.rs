//! Token computation: signing and verifying download URLs.
//!
//! The token is an HMAC-SHA256 over the canonical form of the URL,
//! keyed by the shared secret. Everything the canonical form covers is
//! tamper-evident: the path, every visible parameter, the advertised
//! binding flags, and the hidden attribute pairs the engaged binders
//! contribute. Verification recomputes the digest from the presented
//! URL and the redeeming request's context and compares in constant
//! time.
//!
//! Verification deliberately reports a bare boolean. The reasons a URL
//! was rejected are logged at debug level but never returned, so a
//! caller probing the verifier cannot learn which check tripped.

use std::fmt;

use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::binding::{BinderRegistry, OptionFlag};
use crate::canonical::{canonicalize, encode_query, parse_query, split_url};
use crate::context::RequestContext;
use crate::error::SignError;
use crate::secret::{Secret, SecretProvider};

type HmacSha256 = Hmac<Sha256>;

/// A URL pending signature: endpoint, visible parameters, and the
/// binding options to engage.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    base_url: String,
    params: Vec<(String, String)>,
    options: Vec<OptionFlag>,
}

impl SigningRequest {
    /// Start a request for the given endpoint.
    ///
    /// The endpoint may already carry a query string; its parameters
    /// are folded in ahead of the ones added with [`Self::param`].
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            params: Vec::new(),
            options: Vec::new(),
        }
    }

    /// Append a visible query parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Engage a binding option.
    #[must_use]
    pub fn option(mut self, flag: OptionFlag) -> Self {
        self.options.push(flag);
        self
    }
}

/// The keyed digest carried under the `token` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Reserved query parameter carrying the token.
    pub const PARAM: &str = "token";

    /// Length of a token in hex characters (HMAC-SHA256 output).
    pub const LEN: usize = 64;

    /// Parse a presented token value.
    ///
    /// Returns `None` unless the value is exactly 64 lowercase hex
    /// characters.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let well_formed = value.len() == Self::LEN
            && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        well_formed.then(|| Self(value.to_owned()))
    }

    /// Get the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a presented token in constant time.
    #[must_use]
    pub fn matches(&self, presented: &Self) -> bool {
        bool::from(self.0.as_bytes().ct_eq(presented.0.as_bytes()))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A signed URL: the visible URL plus the token to append.
#[derive(Debug, Clone)]
pub struct SignedUrl {
    url: String,
    token: Token,
}

impl SignedUrl {
    /// The URL without its token parameter.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The computed token.
    #[must_use]
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// The redeemable URL, with the token appended as the final
    /// parameter.
    #[must_use]
    pub fn into_url(self) -> String {
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}{}={}", self.url, separator, Token::PARAM, self.token)
    }
}

/// Sign a download URL.
///
/// The visible parameters are the base URL's own query parameters
/// followed by the request's. Caller-supplied `token` and `o` entries
/// are discarded; those names are reserved. When the request engages
/// binding options that have registered binders, the `o` parameter
/// advertising them is appended and the binders' hidden attribute
/// pairs are folded into the digest without appearing in the URL.
///
/// # Errors
/// Returns an error when the secret provider has no secret or an
/// engaged binder fails.
///
/// # Examples
///
/// ```
/// use securl_sign::{BinderRegistry, SigningRequest, StaticContext, StaticSecretProvider};
/// use securl_sign::{sign, verify};
///
/// let request = SigningRequest::new("/download").param("eddfile", "42:7:3");
/// let secrets = StaticSecretProvider::new("S");
/// let context = StaticContext::default();
/// let binders = BinderRegistry::new();
///
/// let url = sign(&request, &secrets, &context, &binders).unwrap().into_url();
/// assert!(url.starts_with("/download?eddfile=42%3A7%3A3&token="));
/// assert!(verify(&url, &secrets, &context, &binders));
/// ```
pub fn sign(
    request: &SigningRequest,
    secrets: &dyn SecretProvider,
    context: &dyn RequestContext,
    binders: &BinderRegistry,
) -> Result<SignedUrl, SignError> {
    let secret = secrets.shared_secret()?;
    let (endpoint, query) = split_url(&request.base_url);

    let mut visible: Vec<(String, String)> = Vec::new();
    if let Some(query) = query {
        visible.extend(parse_query(query));
    }
    visible.extend(request.params.iter().cloned());
    // `token` and `o` are reserved: a stale token must not feed the new
    // digest, and `o` has to reflect the binders actually engaged.
    visible.retain(|(name, _)| name != Token::PARAM && name != OptionFlag::PARAM);

    let engaged = binders.engaged(&request.options);
    let flags: Vec<OptionFlag> = engaged.iter().map(|binder| binder.flag()).collect();
    if !flags.is_empty() {
        visible.push((OptionFlag::PARAM.to_owned(), OptionFlag::join(&flags)));
    }

    let mut digest_input = visible.clone();
    for binder in &engaged {
        let pairs = binder.bind(context).map_err(|source| SignError::Binding {
            flag: binder.flag().as_str().to_owned(),
            source,
        })?;
        digest_input.extend(pairs);
    }

    let canonical = canonicalize(endpoint, &digest_input);
    let token = compute_token(&secret, &canonical);
    debug!(endpoint, bindings = flags.len(), "signed download url");

    let url = if visible.is_empty() {
        endpoint.to_owned()
    } else {
        format!("{endpoint}?{}", encode_query(&visible))
    };
    Ok(SignedUrl { url, token })
}

/// Verify a presented download URL against the redeeming request's
/// context.
///
/// Returns `true` only when the URL carries a well-formed token that
/// matches the recomputed digest. Every failure, from a missing query
/// string to a mismatched digest, collapses to `false`.
#[must_use]
pub fn verify(
    url: &str,
    secrets: &dyn SecretProvider,
    context: &dyn RequestContext,
    binders: &BinderRegistry,
) -> bool {
    match check(url, secrets, context, binders) {
        Ok(()) => true,
        Err(reason) => {
            debug!(%reason, "rejected download url");
            false
        }
    }
}

/// Why a URL failed verification. Internal only: callers see a plain
/// boolean so the failing check cannot be probed.
#[derive(Debug, thiserror::Error)]
enum VerifyError {
    #[error("no query string")]
    MissingQuery,
    #[error("no token parameter")]
    MissingToken,
    #[error("malformed token value")]
    MalformedToken,
    #[error("token mismatch")]
    TokenMismatch,
    #[error(transparent)]
    Sign(#[from] SignError),
}

fn check(
    url: &str,
    secrets: &dyn SecretProvider,
    context: &dyn RequestContext,
    binders: &BinderRegistry,
) -> Result<(), VerifyError> {
    let (endpoint, query) = split_url(url);
    let query = query.ok_or(VerifyError::MissingQuery)?;
    let mut params = parse_query(query);
    let presented = take_token(&mut params)?;

    let flags = params
        .iter()
        .find(|(name, _)| name == OptionFlag::PARAM)
        .map(|(_, value)| OptionFlag::parse_list(value))
        .unwrap_or_default();

    let secret = secrets.shared_secret()?;
    let mut digest_input = params;
    for binder in binders.engaged(&flags) {
        let pairs = binder.bind(context).map_err(|source| SignError::Binding {
            flag: binder.flag().as_str().to_owned(),
            source,
        })?;
        digest_input.extend(pairs);
    }

    let canonical = canonicalize(endpoint, &digest_input);
    let expected = compute_token(&secret, &canonical);
    if expected.matches(&presented) {
        Ok(())
    } else {
        Err(VerifyError::TokenMismatch)
    }
}

/// Pull the presented token out of the parameter list. The token is
/// never part of its own digest input.
fn take_token(params: &mut Vec<(String, String)>) -> Result<Token, VerifyError> {
    let mut presented = None;
    params.retain(|(name, value)| {
        if name == Token::PARAM {
            if presented.is_none() {
                presented = Some(value.clone());
            }
            false
        } else {
            true
        }
    });
    let value = presented.ok_or(VerifyError::MissingToken)?;
    Token::parse(&value).ok_or(VerifyError::MalformedToken)
}

/// Compute the token for a canonical string under the given secret.
fn compute_token(secret: &Secret, canonical: &str) -> Token {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(canonical.as_bytes());
    Token(hex::encode(mac.finalize().into_bytes()))
}
