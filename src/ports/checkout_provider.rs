//! Hosted-checkout provider port.
//!
//! Creates a provider-hosted checkout session for a plan purchase and
//! returns the URL the client is redirected to. The mock implementation is
//! a development-mode behavior gated by an explicit configuration flag,
//! never a silent production fallback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;
use crate::domain::payment::{BillingCycle, PaymentError, Plan};

/// A created hosted-checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session id.
    pub session_id: String,

    /// URL for the customer to complete checkout.
    pub url: String,
}

/// Request to create a hosted-checkout session.
#[derive(Debug, Clone)]
pub struct CreateCheckoutRequest {
    pub user_id: UserId,
    pub plan: Plan,
    pub billing_cycle: BillingCycle,
    /// Price from the configured plan table, in minor units.
    pub amount_minor: i64,
}

/// Port for hosted-checkout session creation.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    async fn create_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}
