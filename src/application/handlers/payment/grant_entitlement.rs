//! GrantEntitlementHandler - applies the side effects of a paid order.
//!
//! Runs on the pending->paid edge only: the caller gates on
//! `TransitionOutcome::Transitioned`, and the order store guarantees that
//! edge fires at most once per order. Plan update, audit record, and
//! notification travel together as one logical unit.

use std::sync::Arc;

use crate::domain::payment::{Order, PaymentError};
use crate::ports::{AuditRecord, EntitlementStore, Notification};

/// Handler applying subscription side effects for a settled order.
pub struct GrantEntitlementHandler {
    entitlements: Arc<dyn EntitlementStore>,
}

impl GrantEntitlementHandler {
    pub fn new(entitlements: Arc<dyn EntitlementStore>) -> Self {
        Self { entitlements }
    }

    /// Applies plan entitlement, audit record, and notification for a paid
    /// order.
    pub async fn handle(&self, order: &Order) -> Result<(), PaymentError> {
        self.entitlements
            .set_plan(&order.user_id, order.plan)
            .await?;

        let record = AuditRecord::new(
            "plan_upgraded",
            serde_json::json!({
                "order_id": order.id.to_string(),
                "plan": order.plan.as_str(),
                "billing_cycle": order.billing_cycle.as_str(),
                "provider": order.rail.as_str(),
                "amount_cents": order.amount_minor,
            }),
        );
        self.entitlements
            .append_audit(&order.user_id, record)
            .await?;

        let notification = Notification::new(
            "payment",
            "Payment received",
            format!("Your {} plan is now active.", order.plan.display_name()),
        );
        self.entitlements
            .push_notification(&order.user_id, notification)
            .await?;

        tracing::info!(
            order_id = %order.id,
            user_id = %order.user_id,
            plan = %order.plan,
            "Plan entitlement granted"
        );
        Ok(())
    }
}
