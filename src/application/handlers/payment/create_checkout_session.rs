//! CreateCheckoutSessionHandler - hosted-checkout session creation.
//!
//! The body's `userId` is only ever compared against the verified
//! credential's subject; a mismatch is a spoofing attempt and is rejected
//! before anything else happens. The amount comes from the configured plan
//! price table, never from the client.

use std::sync::Arc;

use crate::config::PlanPriceTable;
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::payment::{BillingCycle, FieldError, PaymentError, Plan};
use crate::ports::{CheckoutProvider, CheckoutSession, CreateCheckoutRequest};

/// Command to create a hosted-checkout session.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionCommand {
    /// Authenticated caller.
    pub principal: AuthenticatedUser,
    /// Client-supplied user id; checked for equality against the principal.
    pub user_id: Option<String>,
    /// Requested plan name.
    pub plan_name: Option<String>,
    /// Requested billing cycle; defaults to monthly.
    pub billing_cycle: Option<String>,
}

/// Handler for checkout-session creation.
pub struct CreateCheckoutSessionHandler {
    provider: Arc<dyn CheckoutProvider>,
    prices: PlanPriceTable,
}

impl CreateCheckoutSessionHandler {
    pub fn new(provider: Arc<dyn CheckoutProvider>, prices: PlanPriceTable) -> Self {
        Self { provider, prices }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CheckoutSession, PaymentError> {
        // Spoofing guard first: a body userId that disagrees with the
        // credential is 403, not 400.
        if let Some(claimed) = cmd.user_id.as_deref() {
            if !cmd.principal.is_same_user(claimed) {
                tracing::warn!(
                    caller = %cmd.principal.id,
                    claimed,
                    "Checkout rejected: body userId does not match credential"
                );
                return Err(PaymentError::Forbidden);
            }
        }

        let mut errors = Vec::new();
        let plan = match cmd.plan_name.as_deref() {
            None => {
                errors.push(FieldError::new("planName", "planName is required"));
                None
            }
            Some(raw) => match Plan::parse(raw) {
                Some(plan) => Some(plan),
                None => {
                    errors.push(FieldError::new("planName", "unknown plan"));
                    None
                }
            },
        };
        let billing_cycle = match cmd.billing_cycle.as_deref() {
            None => Some(BillingCycle::default()),
            Some(raw) => match BillingCycle::parse(raw) {
                Some(cycle) => Some(cycle),
                None => {
                    errors.push(FieldError::new("billingCycle", "unknown billing cycle"));
                    None
                }
            },
        };
        if !errors.is_empty() {
            return Err(PaymentError::Validation(errors));
        }

        let plan = plan.unwrap();
        let billing_cycle = billing_cycle.unwrap();
        let amount_minor = self.prices.price_minor(plan, billing_cycle);

        let session = self
            .provider
            .create_session(CreateCheckoutRequest {
                user_id: cmd.principal.id.clone(),
                plan,
                billing_cycle,
                amount_minor,
            })
            .await?;

        tracing::info!(
            user_id = %cmd.principal.id,
            plan = %plan,
            session_id = %session.session_id,
            "Checkout session created"
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::checkout::MockCheckoutProvider;
    use crate::domain::foundation::UserId;

    fn principal() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("user-1").unwrap(), None)
    }

    fn handler() -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(
            Arc::new(MockCheckoutProvider::new("https://app.example")),
            PlanPriceTable::default(),
        )
    }

    #[tokio::test]
    async fn matching_user_id_creates_session() {
        let result = handler()
            .handle(CreateCheckoutSessionCommand {
                principal: principal(),
                user_id: Some("user-1".to_string()),
                plan_name: Some("business".to_string()),
                billing_cycle: Some("annual".to_string()),
            })
            .await
            .unwrap();

        assert!(!result.session_id.is_empty());
        assert!(result.url.contains("plan=business"));
    }

    #[tokio::test]
    async fn absent_user_id_defaults_to_principal() {
        let result = handler()
            .handle(CreateCheckoutSessionCommand {
                principal: principal(),
                user_id: None,
                plan_name: Some("starter".to_string()),
                billing_cycle: None,
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn mismatched_user_id_is_forbidden() {
        let result = handler()
            .handle(CreateCheckoutSessionCommand {
                principal: principal(),
                user_id: Some("someone-else".to_string()),
                plan_name: Some("starter".to_string()),
                billing_cycle: None,
            })
            .await;

        assert!(matches!(result, Err(PaymentError::Forbidden)));
    }

    #[tokio::test]
    async fn unknown_plan_is_a_validation_error() {
        let result = handler()
            .handle(CreateCheckoutSessionCommand {
                principal: principal(),
                user_id: None,
                plan_name: Some("platinum".to_string()),
                billing_cycle: None,
            })
            .await;

        match result {
            Err(PaymentError::Validation(errors)) => {
                assert!(errors.iter().any(|e| e.field == "planName"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
