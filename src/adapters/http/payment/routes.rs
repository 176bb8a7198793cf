//! Axum router configuration for the payment endpoints.

use axum::{routing::post, Router};

use super::handlers::{
    create_checkout_session, indian_payment, payu_payment, PaymentAppState,
};

/// Create the payment API router.
///
/// # Routes
///
/// All require `Authorization: Bearer <token>`:
/// - `POST /indian-payment` - multi-rail initiate / verify / check_status
/// - `POST /payu-payment` - card-gateway initiate / verify
/// - `POST /create-checkout-session` - hosted-checkout session creation
pub fn payment_routes() -> Router<PaymentAppState> {
    Router::new()
        .route("/indian-payment", post(indian_payment))
        .route("/payu-payment", post(payu_payment))
        .route("/create-checkout-session", post(create_checkout_session))
}
