//! Mock checkout provider.
//!
//! Development-mode stand-in gated by the explicit `checkout.mock_mode`
//! configuration flag. Returns a deterministic success redirect without
//! calling any external provider. Configuration validation rejects the flag
//! in production, so this can never become a silent fallback there.

use async_trait::async_trait;

use crate::domain::foundation::OrderId;
use crate::domain::payment::PaymentError;
use crate::ports::{CheckoutProvider, CheckoutSession, CreateCheckoutRequest};

/// Mock checkout provider returning a local success redirect.
pub struct MockCheckoutProvider {
    redirect_base_url: String,
}

impl MockCheckoutProvider {
    pub fn new(redirect_base_url: impl Into<String>) -> Self {
        Self {
            redirect_base_url: redirect_base_url.into(),
        }
    }
}

#[async_trait]
impl CheckoutProvider for MockCheckoutProvider {
    async fn create_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let session_id = format!("mock_{}", OrderId::new().as_uuid().simple());
        tracing::info!(
            user_id = %request.user_id,
            plan = %request.plan,
            session_id = %session_id,
            "Mock checkout session created"
        );

        Ok(CheckoutSession {
            url: format!(
                "{}/checkout/mock-success?session={}&plan={}",
                self.redirect_base_url.trim_end_matches('/'),
                session_id,
                request.plan
            ),
            session_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::payment::{BillingCycle, Plan};

    #[tokio::test]
    async fn mock_session_carries_plan_and_mock_prefix() {
        let provider = MockCheckoutProvider::new("https://app.hostpay.in/");
        let session = provider
            .create_session(CreateCheckoutRequest {
                user_id: UserId::new("user-1").unwrap(),
                plan: Plan::Starter,
                billing_cycle: BillingCycle::Monthly,
                amount_minor: 99_900,
            })
            .await
            .unwrap();

        assert!(session.session_id.starts_with("mock_"));
        assert!(session
            .url
            .starts_with("https://app.hostpay.in/checkout/mock-success?session=mock_"));
        assert!(session.url.ends_with("&plan=starter"));
    }
}
