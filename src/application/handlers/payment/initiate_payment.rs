//! InitiatePaymentHandler - command handler for starting a payment.
//!
//! Flow: validate the raw fields, resolve the rail adapter (fail fast for
//! unconfigured rails - before any order row exists), create the pending
//! order, attach a fresh transaction reference, then hand intent and order
//! to the adapter.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, TxnId};
use crate::domain::payment::{
    validate_initiate, InitiateFields, Order, PaymentError, Rail,
};
use crate::ports::{OrderStore, RailRegistry, RailResult};

/// Command to initiate a payment.
#[derive(Debug, Clone)]
pub struct InitiatePaymentCommand {
    /// Authenticated caller; the only trusted identity source.
    pub principal: AuthenticatedUser,
    /// Raw request fields, not yet validated.
    pub fields: InitiateFields,
    /// Rails the invoking endpoint accepts.
    pub allowed_rails: Vec<Rail>,
}

/// Result of a successful initiation.
#[derive(Debug, Clone)]
pub struct InitiatePaymentResult {
    pub order: Order,
    pub rail_result: RailResult,
}

/// Handler for payment initiation.
pub struct InitiatePaymentHandler {
    orders: Arc<dyn OrderStore>,
    rails: Arc<RailRegistry>,
}

impl InitiatePaymentHandler {
    pub fn new(orders: Arc<dyn OrderStore>, rails: Arc<RailRegistry>) -> Self {
        Self { orders, rails }
    }

    pub async fn handle(
        &self,
        cmd: InitiatePaymentCommand,
    ) -> Result<InitiatePaymentResult, PaymentError> {
        let intent =
            validate_initiate(&cmd.fields, &cmd.allowed_rails).map_err(PaymentError::Validation)?;

        // Resolve the adapter before touching the store: an unconfigured
        // rail aborts the whole operation with no order row written.
        let adapter = self.rails.adapter(intent.rail)?;

        let mut order = self
            .orders
            .create(
                cmd.principal.id.clone(),
                intent.plan,
                intent.amount_minor,
                intent.billing_cycle,
                intent.rail,
            )
            .await?;

        let txn_ref = TxnId::generate();
        self.orders
            .set_provider_ref(order.id, txn_ref.clone())
            .await?;
        order.provider_ref = Some(txn_ref);

        let rail_result = adapter.build(&intent, &order).await?;

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            rail = %intent.rail,
            amount_cents = order.amount_minor,
            "Payment initiated"
        );

        Ok(InitiatePaymentResult { order, rail_result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryOrderStore;
    use crate::adapters::rails::UpiAdapter;
    use crate::config::UpiConfig;
    use crate::domain::foundation::UserId;
    use crate::domain::payment::OrderStatus;

    const ALL_RAILS: &[Rail] = &[Rail::Payu, Rail::Upi, Rail::Gpay, Rail::Cashfree];

    fn principal() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("user-1").unwrap(),
            Some("jane@example.com".to_string()),
        )
    }

    fn upi_fields() -> InitiateFields {
        InitiateFields {
            provider: Some("upi".to_string()),
            amount: Some(999.0),
            product_info: None,
            customer_name: Some("Jane".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: None,
            plan: Some("starter".to_string()),
            billing_cycle: None,
        }
    }

    fn upi_registry() -> Arc<RailRegistry> {
        let mut registry = RailRegistry::new();
        registry.register(Arc::new(UpiAdapter::collect(UpiConfig {
            payee_vpa: "hostpay@icici".to_string(),
            ..Default::default()
        })));
        Arc::new(registry)
    }

    #[tokio::test]
    async fn initiate_creates_pending_order_with_txn_ref() {
        let orders = Arc::new(InMemoryOrderStore::new());
        let handler = InitiatePaymentHandler::new(orders.clone(), upi_registry());

        let result = handler
            .handle(InitiatePaymentCommand {
                principal: principal(),
                fields: upi_fields(),
                allowed_rails: ALL_RAILS.to_vec(),
            })
            .await
            .unwrap();

        assert_eq!(result.order.status, OrderStatus::Pending);
        assert_eq!(result.order.amount_minor, 99_900);
        assert!(result.order.provider_ref.is_some());

        let stored = orders.get(result.order.id).await.unwrap();
        assert_eq!(stored.provider_ref, result.order.provider_ref);
        assert!(matches!(result.rail_result, RailResult::Upi { .. }));
    }

    #[tokio::test]
    async fn order_owner_comes_from_the_credential() {
        let orders = Arc::new(InMemoryOrderStore::new());
        let handler = InitiatePaymentHandler::new(orders.clone(), upi_registry());

        let result = handler
            .handle(InitiatePaymentCommand {
                principal: principal(),
                fields: upi_fields(),
                allowed_rails: ALL_RAILS.to_vec(),
            })
            .await
            .unwrap();

        assert_eq!(result.order.user_id.as_str(), "user-1");
    }

    #[tokio::test]
    async fn invalid_fields_are_rejected_before_any_store_write() {
        let orders = Arc::new(InMemoryOrderStore::new());
        let handler = InitiatePaymentHandler::new(orders.clone(), upi_registry());

        let result = handler
            .handle(InitiatePaymentCommand {
                principal: principal(),
                fields: InitiateFields {
                    amount: Some(0.0),
                    ..upi_fields()
                },
                allowed_rails: ALL_RAILS.to_vec(),
            })
            .await;

        assert!(matches!(result, Err(PaymentError::Validation(_))));
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_rail_aborts_before_order_creation() {
        let orders = Arc::new(InMemoryOrderStore::new());
        // Registry without the card gateway.
        let handler = InitiatePaymentHandler::new(orders.clone(), upi_registry());

        let result = handler
            .handle(InitiatePaymentCommand {
                principal: principal(),
                fields: InitiateFields {
                    provider: Some("payu".to_string()),
                    ..upi_fields()
                },
                allowed_rails: ALL_RAILS.to_vec(),
            })
            .await;

        assert!(matches!(result, Err(PaymentError::NotConfigured(_))));
        assert!(orders.is_empty());
    }
}
