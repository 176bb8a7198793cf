//! In-memory implementation of the order store.
//!
//! Backs tests and local development. The transition check-and-set happens
//! under a single mutex, which gives the same atomicity the PostgreSQL
//! store gets from its conditional UPDATE: two concurrent duplicate
//! deliveries cannot both observe `pending`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{OrderId, Timestamp, TxnId, UserId};
use crate::domain::payment::{
    BillingCycle, Order, PaymentError, Plan, Rail, SettlementOutcome, TransitionOutcome,
};
use crate::ports::OrderStore;

/// In-memory order store.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders; test helper.
    pub fn len(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    /// True when no orders exist; test helper.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create(
        &self,
        user_id: UserId,
        plan: Plan,
        amount_minor: i64,
        billing_cycle: BillingCycle,
        rail: Rail,
    ) -> Result<Order, PaymentError> {
        let order = Order::create(user_id, plan, amount_minor, billing_cycle, rail);
        self.orders
            .lock()
            .unwrap()
            .insert(order.id, order.clone());
        Ok(order)
    }

    async fn set_provider_ref(
        &self,
        order_id: OrderId,
        txn_ref: TxnId,
    ) -> Result<(), PaymentError> {
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .get_mut(&order_id)
            .ok_or(PaymentError::OrderNotFound(order_id))?;
        order.provider_ref = Some(txn_ref);
        Ok(())
    }

    async fn transition(
        &self,
        order_id: OrderId,
        outcome: SettlementOutcome,
    ) -> Result<TransitionOutcome, PaymentError> {
        let mut orders = self.orders.lock().unwrap();
        let order = orders
            .get_mut(&order_id)
            .ok_or(PaymentError::OrderNotFound(order_id))?;

        if order.settle(outcome, Timestamp::now()) {
            Ok(TransitionOutcome::Transitioned(order.clone()))
        } else {
            Ok(TransitionOutcome::AlreadySettled(order.clone()))
        }
    }

    async fn get(&self, order_id: OrderId) -> Result<Order, PaymentError> {
        self.orders
            .lock()
            .unwrap()
            .get(&order_id)
            .cloned()
            .ok_or(PaymentError::OrderNotFound(order_id))
    }
}
