//! Rail adapter port.
//!
//! One implementation per payment rail, all behind a single seam:
//! `build(intent, order) -> RailResult`. Adapters take the amount from the
//! validated intent/order only - never from callback data - and fail fast
//! with `NotConfigured` when merchant credentials are absent rather than
//! emitting a broken payment link.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::payment::{Order, PaymentError, PaymentIntent, Rail};

/// What a rail needs the client to do next, keyed by rail family.
///
/// Discriminated union: each variant carries exactly what that rail's
/// completion flow uses, with no shared mutable state between variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RailResult {
    /// Hosted-redirect card gateway: POST the signed params to the URL.
    Card {
        payment_url: String,
        /// Ordered form fields including the request hash.
        params: BTreeMap<String, String>,
    },

    /// UPI collect: same string doubles as QR payload and app intent URI.
    Upi {
        upi_uri: String,
        qr_payload: String,
        /// Wallet-scheme deep link, present on the wallet variant.
        gpay_deep_link: Option<String>,
    },

    /// Server-created gateway order with a redirect URL.
    Gateway {
        gateway_order_id: String,
        payment_url: String,
    },
}

/// Port for building rail-specific payment requests.
#[async_trait]
pub trait RailAdapter: Send + Sync {
    /// The rail this adapter serves.
    fn rail(&self) -> Rail;

    /// Builds the rail-specific request for a validated intent and its
    /// freshly created order (which already carries the txn reference).
    async fn build(&self, intent: &PaymentIntent, order: &Order)
        -> Result<RailResult, PaymentError>;
}

/// Registry of available rail adapters: the single dispatch point.
///
/// Adding a rail means adding one adapter and one registration line;
/// nothing in the orchestrator changes. Rails whose credentials are absent
/// are simply never registered, so resolving them fails fast *before* any
/// order is created.
pub struct RailRegistry {
    adapters: HashMap<Rail, Arc<dyn RailAdapter>>,
}

impl RailRegistry {
    /// Empty registry; adapters are registered by the composition root.
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Registers an adapter under its own rail.
    pub fn register(&mut self, adapter: Arc<dyn RailAdapter>) {
        self.adapters.insert(adapter.rail(), adapter);
    }

    /// Resolves the adapter for a rail; `NotConfigured` for absent rails.
    pub fn adapter(&self, rail: Rail) -> Result<Arc<dyn RailAdapter>, PaymentError> {
        self.adapters
            .get(&rail)
            .cloned()
            .ok_or_else(|| PaymentError::not_configured(rail))
    }

    /// Rails currently available.
    pub fn configured_rails(&self) -> Vec<Rail> {
        self.adapters.keys().copied().collect()
    }
}

impl Default for RailRegistry {
    fn default() -> Self {
        Self::new()
    }
}
