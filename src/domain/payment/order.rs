//! Order entity and its settlement state machine.
//!
//! An order is the durable record of one purchase attempt. It is created
//! `pending`, moves exactly once to `paid` or `failed`, and is never deleted
//! (financial record). Terminal states are absorbing: re-delivery of a
//! provider callback for a settled order is a no-op.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OrderId, Timestamp, TxnId, UserId};

use super::{BillingCycle, Plan, Rail};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created, awaiting provider resolution.
    Pending,

    /// Settled successfully.
    Paid,

    /// Settled unsuccessfully.
    Failed,
}

impl OrderStatus {
    /// Returns true once the order can no longer change state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }

    /// Returns the wire/store name for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal outcome a provider can report for an order.
///
/// A provider status that maps to neither variant (pending, user dropped,
/// unknown) must not transition the order at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementOutcome {
    Paid,
    Failed,
}

impl SettlementOutcome {
    /// Maps a provider-reported status string onto a terminal outcome.
    ///
    /// Returns `None` for in-flight or unrecognized statuses; callers leave
    /// the order pending in that case.
    pub fn from_provider_status(status: &str) -> Option<Self> {
        match status.trim().to_lowercase().as_str() {
            "success" | "paid" | "captured" => Some(SettlementOutcome::Paid),
            "failure" | "failed" | "cancelled" => Some(SettlementOutcome::Failed),
            _ => None,
        }
    }

    /// Returns the order status this outcome settles into.
    pub fn as_status(&self) -> OrderStatus {
        match self {
            SettlementOutcome::Paid => OrderStatus::Paid,
            SettlementOutcome::Failed => OrderStatus::Failed,
        }
    }
}

/// Result of asking the store to settle an order.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// The order moved from pending into the requested terminal state.
    /// Side effects (entitlement, audit, notification) fire on this arm only.
    Transitioned(Order),

    /// The order was already terminal; nothing changed.
    AlreadySettled(Order),
}

impl TransitionOutcome {
    /// Returns the order regardless of which arm applied.
    pub fn order(&self) -> &Order {
        match self {
            TransitionOutcome::Transitioned(order) => order,
            TransitionOutcome::AlreadySettled(order) => order,
        }
    }

    /// Returns true if this call actually changed state.
    pub fn did_transition(&self) -> bool {
        matches!(self, TransitionOutcome::Transitioned(_))
    }
}

/// Durable record of one purchase attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Opaque unique identifier, assigned at creation.
    pub id: OrderId,

    /// Owner; immutable after creation.
    pub user_id: UserId,

    /// Plan being purchased.
    pub plan: Plan,

    /// Amount in the currency's smallest unit (paise). Never floating point,
    /// never recomputed from callback data.
    pub amount_minor: i64,

    /// Lifecycle status.
    pub status: OrderStatus,

    /// Billing cycle for the purchased plan.
    pub billing_cycle: BillingCycle,

    /// Rail the order was initiated on.
    pub rail: Rail,

    /// Transaction reference handed to the rail; set after creation because
    /// the card gateway needs it to exist before the request hash is computed.
    pub provider_ref: Option<TxnId>,

    /// Creation time.
    pub created_at: Timestamp,

    /// Settlement time; None until paid.
    pub paid_at: Option<Timestamp>,
}

impl Order {
    /// Creates a new pending order.
    pub fn create(
        user_id: UserId,
        plan: Plan,
        amount_minor: i64,
        billing_cycle: BillingCycle,
        rail: Rail,
    ) -> Self {
        Self {
            id: OrderId::new(),
            user_id,
            plan,
            amount_minor,
            status: OrderStatus::Pending,
            billing_cycle,
            rail,
            provider_ref: None,
            created_at: Timestamp::now(),
            paid_at: None,
        }
    }

    /// Returns true if the given caller owns this order.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Applies a settlement outcome in place if the order is still pending.
    ///
    /// Returns whether a transition happened. Stores that hold orders in
    /// memory call this under their own lock; the PostgreSQL store encodes
    /// the same rule as a conditional UPDATE instead.
    pub fn settle(&mut self, outcome: SettlementOutcome, at: Timestamp) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = outcome.as_status();
        if outcome == SettlementOutcome::Paid {
            self.paid_at = Some(at);
        }
        true
    }
}
