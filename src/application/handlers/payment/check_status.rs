//! CheckStatusHandler - read-only polling query for an order's status.
//!
//! Safe to call arbitrarily often: no side effects, no rate-sensitive
//! invariant. This is how the client observes eventual resolution while a
//! redirect callback may still be in flight.

use std::sync::Arc;

use crate::domain::foundation::AuthenticatedUser;
use crate::domain::payment::{validate_check_status, Order, OrderStatus, PaymentError};
use crate::ports::OrderStore;

/// Query for an order's current status.
#[derive(Debug, Clone)]
pub struct CheckStatusQuery {
    /// Authenticated caller; must own the referenced order.
    pub principal: AuthenticatedUser,
    /// Raw order id, not yet validated.
    pub order_id: Option<String>,
}

/// Snapshot of an order's settlement state.
#[derive(Debug, Clone)]
pub struct CheckStatusResult {
    pub order: Order,
    pub paid: bool,
}

/// Handler for status polling.
pub struct CheckStatusHandler {
    orders: Arc<dyn OrderStore>,
}

impl CheckStatusHandler {
    pub fn new(orders: Arc<dyn OrderStore>) -> Self {
        Self { orders }
    }

    pub async fn handle(&self, query: CheckStatusQuery) -> Result<CheckStatusResult, PaymentError> {
        let order_id =
            validate_check_status(query.order_id.as_deref()).map_err(PaymentError::Validation)?;

        let order = self.orders.get(order_id).await?;
        if !order.is_owned_by(&query.principal.id) {
            tracing::warn!(
                order_id = %order.id,
                caller = %query.principal.id,
                "Status check rejected: caller does not own order"
            );
            return Err(PaymentError::Forbidden);
        }

        let paid = order.status == OrderStatus::Paid;
        Ok(CheckStatusResult { order, paid })
    }
}
