//! Request context sourced from HTTP request parts.

use std::net::IpAddr;

use http::request::Parts;
use securl_sign::RequestContext;

/// [`RequestContext`] backed by [`http::request::Parts`] plus the
/// transport peer address.
///
/// The client address prefers the first `X-Forwarded-For` entry so
/// deployments behind a proxy bind to the original client, falling back
/// to the socket peer when the header is absent. Attributes that cannot
/// be determined are reported as empty strings.
#[derive(Debug, Clone, Copy)]
pub struct PartsContext<'a> {
    parts: &'a Parts,
    peer: Option<IpAddr>,
}

impl<'a> PartsContext<'a> {
    /// Create a context without transport peer information.
    #[must_use]
    pub fn new(parts: &'a Parts) -> Self {
        Self { parts, peer: None }
    }

    /// Create a context with the transport peer address.
    #[must_use]
    pub fn with_peer(parts: &'a Parts, peer: IpAddr) -> Self {
        Self {
            parts,
            peer: Some(peer),
        }
    }
}

impl RequestContext for PartsContext<'_> {
    fn client_address(&self) -> String {
        let forwarded = self
            .parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|first| !first.is_empty());
        if let Some(first) = forwarded {
            return first.to_owned();
        }
        self.peer.map(|ip| ip.to_string()).unwrap_or_default()
    }

    fn user_agent(&self) -> String {
        self.parts
            .headers
            .get(http::header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned()
    }
}
