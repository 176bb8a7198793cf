//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `HOSTPAY` prefix and nested values use double underscores as separators.
//!
//! Merchant credentials, the plan price table, and the checkout mock flag
//! all live here and are injected into the core at construction time;
//! business logic never reads the process environment directly.
//!
//! # Example
//!
//! ```no_run
//! use hostpay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod cashfree;
mod checkout;
mod database;
mod error;
mod payu;
mod server;
mod upi;

pub use auth::AuthConfig;
pub use cashfree::CashfreeConfig;
pub use checkout::{CheckoutConfig, PlanPriceTable};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payu::PayuConfig;
pub use server::{Environment, ServerConfig};
pub use upi::UpiConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Authentication configuration (project-secret JWT)
    #[serde(default)]
    pub auth: AuthConfig,

    /// Card-gateway merchant credentials
    #[serde(default)]
    pub payu: PayuConfig,

    /// UPI payee configuration
    #[serde(default)]
    pub upi: UpiConfig,

    /// Alternate-gateway credentials
    #[serde(default)]
    pub cashfree: CashfreeConfig,

    /// Hosted-checkout provider + plan price table
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `HOSTPAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `HOSTPAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `HOSTPAY__PAYU__MERCHANT_KEY=...` -> `payu.merchant_key = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HOSTPAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.payu.validate()?;
        self.upi.validate()?;
        self.cashfree.validate()?;
        self.checkout.validate(self.server.is_production())?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
