//! Alternate-gateway (Cashfree) rail adapter.
//!
//! Creates a gateway order over HTTPS and hands the client a redirect URL.
//! The outbound call carries a bounded timeout; timeouts and 5xx responses
//! surface as retryable gateway errors rather than hanging the request.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::CashfreeConfig;
use crate::domain::payment::{Order, PaymentError, PaymentIntent, Rail};
use crate::ports::{RailAdapter, RailResult};

use super::format_amount;

/// Gateway API version header value.
const API_VERSION: &str = "2023-08-01";

/// Cashfree rail adapter.
pub struct CashfreeAdapter {
    config: CashfreeConfig,
    http_client: reqwest::Client,
}

/// Order-create request body in the gateway's naming.
#[derive(Debug, Serialize)]
struct CreateOrderBody {
    order_id: String,
    order_amount: String,
    order_currency: String,
    customer_details: CustomerDetails,
    order_note: String,
}

#[derive(Debug, Serialize)]
struct CustomerDetails {
    customer_id: String,
    customer_email: String,
    customer_phone: String,
}

/// Order-create response fields we consume.
#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    cf_order_id: serde_json::Value,
    payment_session_id: String,
    #[serde(default)]
    payment_link: Option<String>,
}

impl CashfreeAdapter {
    pub fn new(config: CashfreeConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    fn create_order_body(intent: &PaymentIntent, order: &Order, txn_ref: &str) -> CreateOrderBody {
        CreateOrderBody {
            order_id: txn_ref.to_string(),
            order_amount: format_amount(order.amount_minor),
            order_currency: "INR".to_string(),
            customer_details: CustomerDetails {
                customer_id: order.user_id.to_string(),
                customer_email: intent.email.clone(),
                customer_phone: intent.phone.clone().unwrap_or_default(),
            },
            order_note: intent.product_info.clone(),
        }
    }
}

#[async_trait]
impl RailAdapter for CashfreeAdapter {
    fn rail(&self) -> Rail {
        Rail::Cashfree
    }

    async fn build(
        &self,
        intent: &PaymentIntent,
        order: &Order,
    ) -> Result<RailResult, PaymentError> {
        if !self.config.is_configured() {
            return Err(PaymentError::not_configured(Rail::Cashfree));
        }

        let txn_ref = order
            .provider_ref
            .as_ref()
            .ok_or_else(|| PaymentError::store("order has no transaction reference"))?;

        let body = Self::create_order_body(intent, order, txn_ref.as_str());
        let url = format!("{}/orders", self.config.base_url.trim_end_matches('/'));

        let response = self
            .http_client
            .post(&url)
            .header("x-client-id", &self.config.app_id)
            .header("x-client-secret", self.config.secret_key.expose_secret())
            .header("x-api-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Gateway order create failed to send");
                if e.is_timeout() || e.is_connect() {
                    PaymentError::gateway_retryable("gateway unreachable")
                } else {
                    PaymentError::gateway("gateway request failed")
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            tracing::error!(status = %status, "Gateway order create returned 5xx");
            return Err(PaymentError::gateway_retryable("gateway unavailable"));
        }
        if !status.is_success() {
            // Full body goes to the log, never to the client.
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, detail = %detail, "Gateway rejected order create");
            return Err(PaymentError::gateway("gateway rejected the order"));
        }

        let parsed: CreateOrderResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Gateway order create response did not parse");
            PaymentError::gateway("gateway returned an unexpected response")
        })?;

        let payment_url = parsed.payment_link.unwrap_or_else(|| {
            format!(
                "{}/view/sessions/{}",
                self.config.base_url.trim_end_matches('/'),
                parsed.payment_session_id
            )
        });

        Ok(RailResult::Gateway {
            gateway_order_id: parsed.cf_order_id.to_string().trim_matches('"').to_string(),
            payment_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{TxnId, UserId};
    use crate::domain::payment::{BillingCycle, Plan};
    use secrecy::SecretString;

    fn test_intent() -> PaymentIntent {
        PaymentIntent {
            rail: Rail::Cashfree,
            amount_minor: 249_900,
            product_info: "Business Plan".to_string(),
            customer_name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: Some("9876543210".to_string()),
            plan: Plan::Business,
            billing_cycle: BillingCycle::Monthly,
        }
    }

    fn test_order(intent: &PaymentIntent) -> Order {
        let mut order = Order::create(
            UserId::new("user-1").unwrap(),
            intent.plan,
            intent.amount_minor,
            intent.billing_cycle,
            Rail::Cashfree,
        );
        order.provider_ref = Some(TxnId::new("TXNcf1").unwrap());
        order
    }

    #[tokio::test]
    async fn unconfigured_adapter_fails_fast() {
        let adapter = CashfreeAdapter::new(CashfreeConfig::default());
        let intent = test_intent();
        let order = test_order(&intent);

        let result = adapter.build(&intent, &order).await;
        assert!(matches!(
            result,
            Err(PaymentError::NotConfigured(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_gateway_maps_to_retryable_error() {
        let adapter = CashfreeAdapter::new(CashfreeConfig {
            app_id: "app123".to_string(),
            secret_key: SecretString::new("secret123".to_string()),
            // Reserved port on localhost: connection refused immediately.
            base_url: "http://127.0.0.1:9/pg".to_string(),
            request_timeout_secs: 1,
        });
        let intent = test_intent();
        let order = test_order(&intent);

        let result = adapter.build(&intent, &order).await;
        match result {
            Err(err @ PaymentError::Gateway { .. }) => assert!(err.is_retryable()),
            other => panic!("expected retryable gateway error, got {:?}", other),
        }
    }

    #[test]
    fn order_body_uses_stored_amount_only() {
        let intent = test_intent();
        let order = test_order(&intent);

        let body = CashfreeAdapter::create_order_body(&intent, &order, "TXNcf1");
        assert_eq!(body.order_id, "TXNcf1");
        assert_eq!(body.order_amount, "2499.00");
        assert_eq!(body.order_currency, "INR");
        assert_eq!(body.customer_details.customer_id, "user-1");
        assert_eq!(body.customer_details.customer_email, "jane@example.com");
    }
}
