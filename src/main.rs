//! Hostpay server entry point.
//!
//! Loads configuration, wires the adapters, and serves the payment API.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use hostpay::adapters::auth::JwtSessionValidator;
use hostpay::adapters::checkout::{HostedCheckoutProvider, MockCheckoutProvider};
use hostpay::adapters::http::{app_router, PaymentAppState};
use hostpay::adapters::postgres::{PostgresEntitlementStore, PostgresOrderStore};
use hostpay::adapters::rails::registry_from_config;
use hostpay::config::AppConfig;
use hostpay::ports::{CheckoutProvider, SessionValidator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let session_validator: Arc<dyn SessionValidator> =
        Arc::new(JwtSessionValidator::new(&config.auth));

    let rails = Arc::new(registry_from_config(
        &config.payu,
        &config.upi,
        &config.cashfree,
    ));
    tracing::info!(rails = ?rails.configured_rails(), "Payment rails configured");

    let checkout: Arc<dyn CheckoutProvider> = if config.checkout.mock_mode {
        tracing::warn!("Checkout provider running in mock mode (development only)");
        Arc::new(MockCheckoutProvider::new(
            config.checkout.redirect_base_url.clone(),
        ))
    } else {
        Arc::new(HostedCheckoutProvider::new(config.checkout.clone()))
    };

    let state = PaymentAppState {
        orders: Arc::new(PostgresOrderStore::new(pool.clone())),
        entitlements: Arc::new(PostgresEntitlementStore::new(pool)),
        rails,
        checkout,
        payu_config: config.payu.clone(),
        prices: config.checkout.prices.clone(),
    };

    let router = app_router(
        state,
        session_validator,
        &config.server.cors_origins_list(),
    );

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "Hostpay listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
