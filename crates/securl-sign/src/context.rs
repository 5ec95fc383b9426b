//! Request-side attributes that binders can fold into the digest.

/// Attributes of the request a URL is being signed or verified for.
///
/// Both protocol sides read the context through this trait, so the same
/// implementation semantics must hold at issue time and at redemption
/// time. Unknown attributes are reported as empty strings rather than
/// errors; an empty value simply binds the token to "attribute absent".
pub trait RequestContext: Send + Sync {
    /// Network address of the requesting client, or empty when unknown.
    fn client_address(&self) -> String;

    /// User-agent string of the requesting client, or empty when unknown.
    fn user_agent(&self) -> String;
}

/// Context with fixed attribute values.
#[derive(Debug, Clone, Default)]
pub struct StaticContext {
    address: String,
    user_agent: String,
}

impl StaticContext {
    /// Create a context with the given address and user agent.
    pub fn new(address: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            user_agent: user_agent.into(),
        }
    }
}

impl RequestContext for StaticContext {
    fn client_address(&self) -> String {
        self.address.clone()
    }

    fn user_agent(&self) -> String {
        self.user_agent.clone()
    }
}
