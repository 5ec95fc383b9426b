//! Attribute binding: folding request attributes into the token digest.
//!
//! A signed URL can be bound to hidden attributes of the requesting
//! client, such as its network address. Bound attributes never appear
//! in the URL; only the short `o` parameter advertises which bindings
//! are engaged, and the attribute values themselves live solely inside
//! the digest. Verification re-reads the same attributes from the
//! redeeming request, so a URL replayed from a different client no
//! longer matches its token.
//!
//! Hosts extend the scheme by registering their own [`AttributeBinder`]
//! implementations; the built-in ones cover client address and
//! user-agent binding.

use std::fmt;
use std::sync::Arc;

use crate::context::RequestContext;

/// A binding attribute a URL can be signed against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OptionFlag {
    /// Bind to the requesting client's network address (`ip`).
    ClientIp,
    /// Bind to the requesting client's user-agent string (`ua`).
    UserAgent,
    /// Host-defined binding attribute, named by its wire string.
    Custom(String),
}

impl OptionFlag {
    /// Reserved query parameter advertising the engaged flags.
    pub const PARAM: &str = "o";

    /// Separator between flags inside the `o` parameter value.
    pub const SEPARATOR: char = ':';

    /// Wire name of the flag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClientIp => "ip",
            Self::UserAgent => "ua",
            Self::Custom(name) => name,
        }
    }

    /// Parse a flag list from an `o` parameter value.
    ///
    /// Empty entries are dropped, so `""` parses to no flags.
    #[must_use]
    pub fn parse_list(value: &str) -> Vec<Self> {
        value
            .split(Self::SEPARATOR)
            .filter(|part| !part.is_empty())
            .map(Self::from)
            .collect()
    }

    /// Join flags into an `o` parameter value.
    #[must_use]
    pub fn join(flags: &[Self]) -> String {
        flags
            .iter()
            .map(Self::as_str)
            .collect::<Vec<_>>()
            .join(":")
    }
}

impl From<&str> for OptionFlag {
    fn from(name: &str) -> Self {
        match name {
            "ip" => Self::ClientIp,
            "ua" => Self::UserAgent,
            other => Self::Custom(other.to_owned()),
        }
    }
}

impl fmt::Display for OptionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One binding strategy: a flag plus the attribute pairs it contributes
/// to the digest.
pub trait AttributeBinder: Send + Sync {
    /// Flag under which this binder is engaged and advertised in `o`.
    fn flag(&self) -> OptionFlag;

    /// Produce the digest-input pairs for the given request context.
    ///
    /// Must be deterministic for a given context: verification replays
    /// the bind against the redeeming request, and the token only
    /// matches when the same pairs come back.
    ///
    /// # Errors
    /// Returns an error when the attribute cannot be produced at all;
    /// signing then degrades to an unsigned URL and verification fails
    /// closed.
    fn bind(&self, context: &dyn RequestContext) -> anyhow::Result<Vec<(String, String)>>;
}

/// Binder folding the client network address into the digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientIpBinder;

impl AttributeBinder for ClientIpBinder {
    fn flag(&self) -> OptionFlag {
        OptionFlag::ClientIp
    }

    fn bind(&self, context: &dyn RequestContext) -> anyhow::Result<Vec<(String, String)>> {
        Ok(vec![("ip".to_owned(), context.client_address())])
    }
}

/// Binder folding the client user-agent string into the digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAgentBinder;

impl AttributeBinder for UserAgentBinder {
    fn flag(&self) -> OptionFlag {
        OptionFlag::UserAgent
    }

    fn bind(&self, context: &dyn RequestContext) -> anyhow::Result<Vec<(String, String)>> {
        Ok(vec![("ua".to_owned(), context.user_agent())])
    }
}

/// Ordered collection of attribute binders.
///
/// Binders are engaged in registration order on both protocol sides, so
/// a host must register the same binders, in the same order, wherever
/// it signs and verifies.
#[derive(Clone, Default)]
pub struct BinderRegistry {
    binders: Vec<Arc<dyn AttributeBinder>>,
}

impl BinderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in client-address and
    /// user-agent binders.
    #[must_use]
    pub fn standard() -> Self {
        Self::new().with(ClientIpBinder).with(UserAgentBinder)
    }

    /// Register a binder at the end of the engagement order.
    pub fn register(&mut self, binder: impl AttributeBinder + 'static) {
        self.binders.push(Arc::new(binder));
    }

    /// Register a binder, consuming and returning the registry.
    #[must_use]
    pub fn with(mut self, binder: impl AttributeBinder + 'static) -> Self {
        self.register(binder);
        self
    }

    /// Flags of all registered binders, in registration order.
    #[must_use]
    pub fn flags(&self) -> Vec<OptionFlag> {
        self.binders.iter().map(|binder| binder.flag()).collect()
    }

    /// Binders whose flag appears in the given list, in registration
    /// order. Flags with no registered binder are ignored.
    #[must_use]
    pub fn engaged(&self, flags: &[OptionFlag]) -> Vec<&dyn AttributeBinder> {
        self.binders
            .iter()
            .filter(|binder| flags.contains(&binder.flag()))
            .map(AsRef::as_ref)
            .collect()
    }

    /// Number of registered binders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.binders.len()
    }

    /// Whether the registry holds no binders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.binders.is_empty()
    }
}

impl fmt::Debug for BinderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinderRegistry")
            .field("flags", &self.flags())
            .finish()
    }
}
