//! Order store port.
//!
//! Durable storage for orders. The single mutation path is `transition`,
//! which implementations must make atomic and idempotent under concurrent
//! duplicate deliveries: transition only if the current status is pending
//! (conditional update, never read-then-write), and report an
//! already-terminal order as `AlreadySettled` rather than erroring.

use async_trait::async_trait;

use crate::domain::foundation::{OrderId, TxnId, UserId};
use crate::domain::payment::{
    BillingCycle, Order, PaymentError, Plan, Rail, SettlementOutcome, TransitionOutcome,
};

/// Port for durable order persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Creates a new pending order with a fresh id.
    async fn create(
        &self,
        user_id: UserId,
        plan: Plan,
        amount_minor: i64,
        billing_cycle: BillingCycle,
        rail: Rail,
    ) -> Result<Order, PaymentError>;

    /// Attaches the rail transaction reference after creation.
    ///
    /// Two-step because the card gateway needs the reference to exist before
    /// the request hash can be computed.
    async fn set_provider_ref(&self, order_id: OrderId, txn_ref: TxnId)
        -> Result<(), PaymentError>;

    /// Settles the order if it is still pending.
    ///
    /// Returns `Transitioned` when this call changed state and
    /// `AlreadySettled` when a previous delivery already did; only the
    /// former triggers side effects. `OrderNotFound` for unknown ids.
    async fn transition(
        &self,
        order_id: OrderId,
        outcome: SettlementOutcome,
    ) -> Result<TransitionOutcome, PaymentError>;

    /// Fetches an order by id.
    ///
    /// Ownership is checked by the caller against the authenticated
    /// principal; the store itself is identity-blind.
    async fn get(&self, order_id: OrderId) -> Result<Order, PaymentError>;
}
