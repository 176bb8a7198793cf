//! HTTP handlers for the payment endpoints.
//!
//! Three POST endpoints, JSON in/out, all behind bearer authentication:
//!
//! - `/indian-payment` - multi-rail entry point (`initiate`/`verify`/`check_status`)
//! - `/payu-payment` - card-gateway-specific (`initiate`/`verify`)
//! - `/create-checkout-session` - hosted-checkout session creation
//!
//! Handlers connect axum routes to the application layer; domain errors map
//! to HTTP statuses in exactly one place at the bottom of this file.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::handlers::payment::{
    CheckStatusHandler, CheckStatusQuery, CreateCheckoutSessionCommand,
    CreateCheckoutSessionHandler, GrantEntitlementHandler, InitiatePaymentCommand,
    InitiatePaymentHandler, VerifyPaymentCommand, VerifyPaymentHandler,
};
use crate::config::{PayuConfig, PlanPriceTable};
use crate::domain::payment::{PaymentError, Rail};
use crate::ports::{CheckoutProvider, EntitlementStore, OrderStore, RailRegistry};

use super::super::middleware::RequireAuth;
use super::dto::{
    CheckStatusResponse, CheckoutSessionResponse, CreateCheckoutSessionRequest, ErrorResponse,
    IndianPaymentRequest, InitiateResponse, PayuPaymentRequest, VerifyResponse,
};

/// Rails the multi-provider endpoint accepts.
const MULTI_RAIL_SET: [Rail; 4] = [Rail::Payu, Rail::Upi, Rail::Gpay, Rail::Cashfree];

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all payment dependencies.
///
/// Cloned per request; everything heavyweight is behind an Arc.
#[derive(Clone)]
pub struct PaymentAppState {
    pub orders: Arc<dyn OrderStore>,
    pub entitlements: Arc<dyn EntitlementStore>,
    pub rails: Arc<RailRegistry>,
    pub checkout: Arc<dyn CheckoutProvider>,
    pub payu_config: PayuConfig,
    pub prices: PlanPriceTable,
}

impl PaymentAppState {
    /// Create handlers on demand from the shared state.
    pub fn initiate_handler(&self) -> InitiatePaymentHandler {
        InitiatePaymentHandler::new(self.orders.clone(), self.rails.clone())
    }

    pub fn verify_handler(&self) -> VerifyPaymentHandler {
        VerifyPaymentHandler::new(
            self.orders.clone(),
            GrantEntitlementHandler::new(self.entitlements.clone()),
            self.payu_config.clone(),
        )
    }

    pub fn check_status_handler(&self) -> CheckStatusHandler {
        CheckStatusHandler::new(self.orders.clone())
    }

    pub fn checkout_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(self.checkout.clone(), self.prices.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Endpoint Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /indian-payment - multi-rail entry point.
pub async fn indian_payment(
    State(state): State<PaymentAppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<IndianPaymentRequest>,
) -> Result<Response, PaymentApiError> {
    match body.action.as_deref() {
        Some("initiate") => {
            let handler = state.initiate_handler();
            let result = handler
                .handle(InitiatePaymentCommand {
                    principal: user,
                    fields: body.initiate_fields(),
                    allowed_rails: MULTI_RAIL_SET.to_vec(),
                })
                .await?;
            let response = InitiateResponse::from_result(&result.order, result.rail_result);
            Ok(Json(response).into_response())
        }
        Some("verify") => {
            let handler = state.verify_handler();
            let result = handler
                .handle(VerifyPaymentCommand {
                    principal: user,
                    fields: body.callback_fields(),
                })
                .await?;
            let response = VerifyResponse {
                success: result.paid,
                order_id: result.order.id.to_string(),
                provider: result.order.rail.as_str().to_string(),
                status: result.order.status.as_str().to_string(),
            };
            Ok(Json(response).into_response())
        }
        Some("check_status") => {
            let handler = state.check_status_handler();
            let result = handler
                .handle(CheckStatusQuery {
                    principal: user,
                    order_id: body.order_id.clone(),
                })
                .await?;
            let response = CheckStatusResponse::from_order(&result.order, result.paid);
            Ok(Json(response).into_response())
        }
        _ => Err(PaymentError::validation(
            "action",
            "action must be one of initiate, verify, check_status",
        )
        .into()),
    }
}

/// POST /payu-payment - card-gateway-specific entry point.
pub async fn payu_payment(
    State(state): State<PaymentAppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<PayuPaymentRequest>,
) -> Result<Response, PaymentApiError> {
    match body.action.as_deref() {
        Some("initiate") => {
            let handler = state.initiate_handler();
            let result = handler
                .handle(InitiatePaymentCommand {
                    principal: user,
                    fields: body.initiate_fields(),
                    allowed_rails: vec![Rail::Payu],
                })
                .await?;
            let response = InitiateResponse::from_result(&result.order, result.rail_result);
            Ok(Json(response).into_response())
        }
        Some("verify") => {
            let handler = state.verify_handler();
            let result = handler
                .handle(VerifyPaymentCommand {
                    principal: user,
                    fields: body.callback_fields(),
                })
                .await?;
            let response = VerifyResponse {
                success: result.paid,
                order_id: result.order.id.to_string(),
                provider: result.order.rail.as_str().to_string(),
                status: result.order.status.as_str().to_string(),
            };
            Ok(Json(response).into_response())
        }
        _ => Err(PaymentError::validation(
            "action",
            "action must be one of initiate, verify",
        )
        .into()),
    }
}

/// POST /create-checkout-session - hosted-checkout session creation.
pub async fn create_checkout_session(
    State(state): State<PaymentAppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreateCheckoutSessionRequest>,
) -> Result<Response, PaymentApiError> {
    let handler = state.checkout_handler();
    let session = handler
        .handle(CreateCheckoutSessionCommand {
            principal: user,
            user_id: body.user_id,
            plan_name: body.plan_name,
            billing_cycle: body.billing_cycle,
        })
        .await?;

    Ok(Json(CheckoutSessionResponse::from(session)).into_response())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct PaymentApiError(PaymentError);

impl From<PaymentError> for PaymentApiError {
    fn from(err: PaymentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PaymentApiError {
    fn into_response(self) -> Response {
        match self.0 {
            PaymentError::Validation(fields) => {
                let body = ErrorResponse::new("VALIDATION_FAILED", "Validation failed")
                    .with_fields(fields);
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            PaymentError::Forbidden => {
                let body =
                    ErrorResponse::new("FORBIDDEN", "You do not have access to this resource");
                (StatusCode::FORBIDDEN, Json(body)).into_response()
            }
            PaymentError::OrderNotFound(_) => {
                let body = ErrorResponse::new("ORDER_NOT_FOUND", "Order not found");
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            PaymentError::NotConfigured(_) => {
                let body = ErrorResponse::new(
                    "PROVIDER_NOT_CONFIGURED",
                    "Payments are temporarily unavailable. Please contact support.",
                );
                (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
            }
            // A failed verification, not a server fault: the caller gets a
            // clean success:false and the order stays untouched.
            PaymentError::SignatureMismatch => {
                let body =
                    ErrorResponse::new("SIGNATURE_MISMATCH", "Payment verification failed");
                (StatusCode::OK, Json(body)).into_response()
            }
            PaymentError::Gateway { .. } | PaymentError::Store(_) => {
                // Detail is already in the server log; the client gets a
                // generic message.
                let body = ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "Something went wrong. Please try again.",
                );
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::checkout::MockCheckoutProvider;
    use crate::adapters::memory::{InMemoryEntitlementStore, InMemoryOrderStore};
    use crate::adapters::rails::UpiAdapter;
    use crate::config::UpiConfig;
    use crate::domain::foundation::{AuthenticatedUser, OrderId, UserId};
    use secrecy::SecretString;

    fn test_user(id: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(id).unwrap(), None)
    }

    fn test_state() -> PaymentAppState {
        let mut rails = RailRegistry::new();
        rails.register(Arc::new(UpiAdapter::collect(UpiConfig {
            payee_vpa: "hostpay@icici".to_string(),
            ..Default::default()
        })));

        PaymentAppState {
            orders: Arc::new(InMemoryOrderStore::new()),
            entitlements: Arc::new(InMemoryEntitlementStore::new()),
            rails: Arc::new(rails),
            checkout: Arc::new(MockCheckoutProvider::new("https://app.example")),
            payu_config: PayuConfig {
                merchant_key: "testkey".to_string(),
                merchant_salt: SecretString::new("testsalt".to_string()),
                ..Default::default()
            },
            prices: PlanPriceTable::default(),
        }
    }

    fn initiate_body() -> IndianPaymentRequest {
        serde_json::from_value(serde_json::json!({
            "action": "initiate",
            "provider": "upi",
            "amount": 999,
            "customerName": "Jane",
            "email": "jane@example.com",
            "plan": "starter"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn initiate_returns_ok_with_upi_payload() {
        let state = test_state();
        let response = indian_payment(
            State(state),
            RequireAuth(test_user("user-1")),
            Json(initiate_body()),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_action_is_bad_request() {
        let state = test_state();
        let body: IndianPaymentRequest =
            serde_json::from_value(serde_json::json!({"action": "refund"})).unwrap();

        let result = indian_payment(State(state), RequireAuth(test_user("user-1")), Json(body))
            .await
            .map(|_| ())
            .unwrap_err();

        assert_eq!(result.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_action_is_bad_request() {
        let state = test_state();
        let body = IndianPaymentRequest::default();

        let result = indian_payment(State(state), RequireAuth(test_user("user-1")), Json(body))
            .await
            .map(|_| ())
            .unwrap_err();

        assert_eq!(result.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn check_status_for_unknown_order_is_not_found() {
        let state = test_state();
        let body: IndianPaymentRequest = serde_json::from_value(serde_json::json!({
            "action": "check_status",
            "orderId": OrderId::new().to_string()
        }))
        .unwrap();

        let result = indian_payment(State(state), RequireAuth(test_user("user-1")), Json(body))
            .await
            .map(|_| ())
            .unwrap_err();

        assert_eq!(result.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn payu_initiate_without_credentials_is_service_unavailable() {
        let mut state = test_state();
        // Registry holds only UPI; the card gateway is not configured.
        state.payu_config = PayuConfig::default();

        let body: PayuPaymentRequest = serde_json::from_value(serde_json::json!({
            "action": "initiate",
            "amount": 2499,
            "customerName": "Jane",
            "email": "jane@example.com",
            "plan": "business"
        }))
        .unwrap();

        let result = payu_payment(State(state), RequireAuth(test_user("user-1")), Json(body))
            .await
            .map(|_| ())
            .unwrap_err();

        assert_eq!(
            result.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn checkout_session_returns_ok() {
        let state = test_state();
        let body: CreateCheckoutSessionRequest = serde_json::from_value(serde_json::json!({
            "userId": "user-1",
            "planName": "starter"
        }))
        .unwrap();

        let response =
            create_checkout_session(State(state), RequireAuth(test_user("user-1")), Json(body))
                .await
                .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn checkout_session_with_foreign_user_id_is_forbidden() {
        let state = test_state();
        let body: CreateCheckoutSessionRequest = serde_json::from_value(serde_json::json!({
            "userId": "someone-else",
            "planName": "starter"
        }))
        .unwrap();

        let result =
            create_checkout_session(State(state), RequireAuth(test_user("user-1")), Json(body))
                .await
                .map(|_| ())
                .unwrap_err();

        assert_eq!(result.into_response().status(), StatusCode::FORBIDDEN);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn api_error_maps_validation_to_400() {
        let err = PaymentApiError(PaymentError::validation("amount", "must be positive"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_maps_forbidden_to_403() {
        let err = PaymentApiError(PaymentError::Forbidden);
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn api_error_maps_not_found_to_404() {
        let err = PaymentApiError(PaymentError::OrderNotFound(OrderId::new()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn api_error_maps_not_configured_to_503() {
        let err = PaymentApiError(PaymentError::not_configured(Rail::Payu));
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn api_error_maps_signature_mismatch_to_200_failure() {
        let err = PaymentApiError(PaymentError::SignatureMismatch);
        assert_eq!(err.into_response().status(), StatusCode::OK);
    }

    #[test]
    fn api_error_maps_gateway_and_store_to_500() {
        let err = PaymentApiError(PaymentError::gateway("provider exploded"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let err = PaymentApiError(PaymentError::store("pool exhausted"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
