//! Alternate-gateway (Cashfree) configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Cashfree gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CashfreeConfig {
    /// Application id issued by the gateway
    #[serde(default)]
    pub app_id: String,

    /// API secret key
    #[serde(default = "empty_secret")]
    pub secret_key: SecretString,

    /// API base URL (sandbox by default)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl CashfreeConfig {
    /// True when both gateway credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.app_id.is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Validate Cashfree configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let has_id = !self.app_id.is_empty();
        let has_secret = !self.secret_key.expose_secret().is_empty();
        if has_id != has_secret {
            return Err(ValidationError::MissingRequired(
                "CASHFREE_APP_ID / CASHFREE_SECRET_KEY",
            ));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for CashfreeConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            secret_key: empty_secret(),
            base_url: default_base_url(),
            request_timeout_secs: default_timeout(),
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_base_url() -> String {
    "https://sandbox.cashfree.com/pg".to_string()
}

fn default_timeout() -> u64 {
    10
}
