//! UPI collect configuration

use serde::Deserialize;

use super::error::ValidationError;

/// UPI payee configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UpiConfig {
    /// Merchant virtual payment address (e.g. `hostpay@icici`)
    #[serde(default)]
    pub payee_vpa: String,

    /// Merchant display name shown in UPI apps
    #[serde(default = "default_merchant_name")]
    pub merchant_name: String,
}

impl UpiConfig {
    /// True when a payee address is present.
    pub fn is_configured(&self) -> bool {
        !self.payee_vpa.is_empty()
    }

    /// Validate UPI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.payee_vpa.is_empty() && !self.payee_vpa.contains('@') {
            return Err(ValidationError::InvalidPayeeAddress);
        }
        Ok(())
    }
}

impl Default for UpiConfig {
    fn default() -> Self {
        Self {
            payee_vpa: String::new(),
            merchant_name: default_merchant_name(),
        }
    }
}

fn default_merchant_name() -> String {
    "Hostpay".to_string()
}
