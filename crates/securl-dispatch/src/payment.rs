//! Payment lookup seam between securl and the storefront's records.
//!
//! URL construction resolves the verbose purchase key to a numeric
//! payment id; dispatch resolves that id back to the purchaser details
//! the download pipeline expects. Both directions go through
//! [`PaymentStore`] so the storefront's actual order storage stays out
//! of this crate.

use std::collections::HashMap;

use securl_core::PaymentId;

/// Purchaser details attached to a payment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMetadata {
    /// Email the purchase was made under.
    pub email: String,
    /// Verbose purchase key the storefront issued for the payment.
    pub purchase_key: String,
}

impl PaymentMetadata {
    /// Create payment metadata.
    pub fn new(email: impl Into<String>, purchase_key: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            purchase_key: purchase_key.into(),
        }
    }
}

/// Read-only view of the storefront's payment records.
///
/// A miss is an answer, not an error: unknown keys and ids return
/// `None`, and the caller decides whether that degrades URL signing or
/// invalidates a dispatch.
pub trait PaymentStore: Send + Sync {
    /// Resolve a verbose purchase key to its payment id.
    fn payment_id_by_key(&self, purchase_key: &str) -> Option<PaymentId>;

    /// Resolve a payment id to its purchaser details.
    fn payment_metadata(&self, payment_id: PaymentId) -> Option<PaymentMetadata>;
}

/// In-memory payment store for tests and small deployments.
#[derive(Debug, Clone, Default)]
pub struct StaticPaymentStore {
    by_key: HashMap<String, PaymentId>,
    metadata: HashMap<PaymentId, PaymentMetadata>,
}

impl StaticPaymentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a payment record, indexing it by id and purchase key.
    pub fn insert(&mut self, payment_id: PaymentId, metadata: PaymentMetadata) {
        self.by_key.insert(metadata.purchase_key.clone(), payment_id);
        self.metadata.insert(payment_id, metadata);
    }

    /// Insert a payment record, consuming and returning the store.
    #[must_use]
    pub fn with(mut self, payment_id: PaymentId, metadata: PaymentMetadata) -> Self {
        self.insert(payment_id, metadata);
        self
    }
}

impl PaymentStore for StaticPaymentStore {
    fn payment_id_by_key(&self, purchase_key: &str) -> Option<PaymentId> {
        self.by_key.get(purchase_key).copied()
    }

    fn payment_metadata(&self, payment_id: PaymentId) -> Option<PaymentMetadata> {
        self.metadata.get(&payment_id).cloned()
    }
}
