//! HTTP adapter: router assembly, middleware, endpoint modules.

pub mod middleware;
pub mod payment;

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::ports::SessionValidator;

use middleware::auth_middleware;

pub use payment::{payment_routes, PaymentAppState};

/// Health probe payload.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "hostpay",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}

/// Builds the CORS layer for browser callers.
///
/// With no configured origins every origin is allowed (the endpoints are
/// bearer-authenticated, not cookie-authenticated, so this is safe).
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let parsed: Vec<axum::http::HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(parsed)
    }
}

/// Assembles the full application router.
pub fn app_router(
    state: PaymentAppState,
    session_validator: Arc<dyn SessionValidator>,
    cors_origins: &[String],
) -> Router {
    Router::new()
        .merge(payment_routes())
        .layer(from_fn_with_state(session_validator, auth_middleware))
        .with_state(state)
        .route("/health", get(health))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::checkout::MockCheckoutProvider;
    use crate::adapters::memory::{InMemoryEntitlementStore, InMemoryOrderStore};
    use crate::config::{PayuConfig, PlanPriceTable};
    use crate::ports::RailRegistry;

    #[test]
    fn app_router_assembles_with_mock_dependencies() {
        let state = PaymentAppState {
            orders: Arc::new(InMemoryOrderStore::new()),
            entitlements: Arc::new(InMemoryEntitlementStore::new()),
            rails: Arc::new(RailRegistry::new()),
            checkout: Arc::new(MockCheckoutProvider::new("https://app.example")),
            payu_config: PayuConfig::default(),
            prices: PlanPriceTable::default(),
        };
        let validator: Arc<dyn SessionValidator> = Arc::new(MockSessionValidator::new());

        let _router = app_router(state, validator, &[]);
    }

    #[test]
    fn cors_layer_accepts_configured_origins() {
        let _layer = cors_layer(&["https://app.hostpay.in".to_string()]);
        let _layer = cors_layer(&[]);
    }
}
