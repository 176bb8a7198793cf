//! Hosted-checkout provider adapter.
//!
//! Creates a checkout session with the external provider over HTTPS. Absent
//! credentials fail fast; the development-time mock lives in its own adapter
//! behind an explicit configuration flag, never here.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::CheckoutConfig;
use crate::domain::payment::PaymentError;
use crate::ports::{CheckoutProvider, CheckoutSession, CreateCheckoutRequest};

/// Hosted-checkout adapter.
pub struct HostedCheckoutProvider {
    config: CheckoutConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct CreateSessionBody {
    client_reference_id: String,
    plan: String,
    billing_cycle: String,
    amount_minor: i64,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct CreateSessionResponse {
    id: String,
    url: String,
}

impl HostedCheckoutProvider {
    pub fn new(config: CheckoutConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl CheckoutProvider for HostedCheckoutProvider {
    async fn create_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        if !self.config.is_configured() {
            return Err(PaymentError::checkout_not_configured());
        }

        let body = CreateSessionBody {
            client_reference_id: request.user_id.to_string(),
            plan: request.plan.as_str().to_string(),
            billing_cycle: request.billing_cycle.as_str().to_string(),
            amount_minor: request.amount_minor,
            currency: "INR".to_string(),
        };

        let url = format!(
            "{}/v1/checkout/sessions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Checkout session create failed to send");
                if e.is_timeout() || e.is_connect() {
                    PaymentError::gateway_retryable("checkout provider unreachable")
                } else {
                    PaymentError::gateway("checkout request failed")
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(PaymentError::gateway_retryable("checkout provider unavailable"));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, detail = %detail, "Checkout provider rejected session");
            return Err(PaymentError::gateway("checkout session was rejected"));
        }

        let parsed: CreateSessionResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Checkout session response did not parse");
            PaymentError::gateway("checkout provider returned an unexpected response")
        })?;

        Ok(CheckoutSession {
            session_id: parsed.id,
            url: parsed.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::payment::{BillingCycle, Plan};
    use secrecy::SecretString;

    fn test_request() -> CreateCheckoutRequest {
        CreateCheckoutRequest {
            user_id: UserId::new("user-1").unwrap(),
            plan: Plan::Business,
            billing_cycle: BillingCycle::Annual,
            amount_minor: 2_499_900,
        }
    }

    #[tokio::test]
    async fn unconfigured_provider_fails_fast() {
        let provider = HostedCheckoutProvider::new(CheckoutConfig::default());
        let result = provider.create_session(test_request()).await;
        assert!(matches!(result, Err(PaymentError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn unreachable_provider_maps_to_retryable_error() {
        let provider = HostedCheckoutProvider::new(CheckoutConfig {
            api_key: SecretString::new("ck_test_123".to_string()),
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 1,
            ..Default::default()
        });

        let result = provider.create_session(test_request()).await;
        match result {
            Err(err @ PaymentError::Gateway { .. }) => assert!(err.is_retryable()),
            other => panic!("expected retryable gateway error, got {:?}", other),
        }
    }
}
