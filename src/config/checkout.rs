//! Hosted-checkout configuration and the plan price table.
//!
//! Prices live in configuration, not in module-level constants, so the core
//! is testable without environment manipulation and operators can reprice
//! without a deploy.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::payment::{BillingCycle, Plan};

/// Hosted-checkout provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutConfig {
    /// Provider API key
    #[serde(default = "empty_secret")]
    pub api_key: SecretString,

    /// Provider API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Development-only: return a mock success redirect instead of calling
    /// the provider. Must be explicitly enabled; never a production
    /// fallback.
    #[serde(default)]
    pub mock_mode: bool,

    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Base URL mock-mode success redirects point back to
    #[serde(default = "default_redirect_base")]
    pub redirect_base_url: String,

    /// Plan prices in paise
    #[serde(default)]
    pub prices: PlanPriceTable,
}

/// Plan prices in minor units (paise), per billing cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanPriceTable {
    #[serde(default = "default_starter_monthly")]
    pub starter_monthly: i64,
    #[serde(default = "default_starter_annual")]
    pub starter_annual: i64,
    #[serde(default = "default_business_monthly")]
    pub business_monthly: i64,
    #[serde(default = "default_business_annual")]
    pub business_annual: i64,
    #[serde(default = "default_enterprise_monthly")]
    pub enterprise_monthly: i64,
    #[serde(default = "default_enterprise_annual")]
    pub enterprise_annual: i64,
}

impl PlanPriceTable {
    /// Looks up the price for a plan and billing cycle, in paise.
    pub fn price_minor(&self, plan: Plan, cycle: BillingCycle) -> i64 {
        match (plan, cycle) {
            (Plan::Starter, BillingCycle::Monthly) => self.starter_monthly,
            (Plan::Starter, BillingCycle::Annual) => self.starter_annual,
            (Plan::Business, BillingCycle::Monthly) => self.business_monthly,
            (Plan::Business, BillingCycle::Annual) => self.business_annual,
            (Plan::Enterprise, BillingCycle::Monthly) => self.enterprise_monthly,
            (Plan::Enterprise, BillingCycle::Annual) => self.enterprise_annual,
        }
    }

    fn all(&self) -> [i64; 6] {
        [
            self.starter_monthly,
            self.starter_annual,
            self.business_monthly,
            self.business_annual,
            self.enterprise_monthly,
            self.enterprise_annual,
        ]
    }
}

impl Default for PlanPriceTable {
    fn default() -> Self {
        Self {
            starter_monthly: default_starter_monthly(),
            starter_annual: default_starter_annual(),
            business_monthly: default_business_monthly(),
            business_annual: default_business_annual(),
            enterprise_monthly: default_enterprise_monthly(),
            enterprise_annual: default_enterprise_annual(),
        }
    }
}

impl CheckoutConfig {
    /// True when the provider API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }

    /// Validate checkout configuration
    ///
    /// `production` comes from the server section; mock mode is rejected
    /// there outright.
    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if production && self.mock_mode {
            return Err(ValidationError::MockModeInProduction);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.prices.all().iter().any(|p| *p <= 0) {
            return Err(ValidationError::InvalidPlanPrice);
        }
        Ok(())
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            api_key: empty_secret(),
            base_url: default_base_url(),
            mock_mode: false,
            request_timeout_secs: default_timeout(),
            redirect_base_url: default_redirect_base(),
            prices: PlanPriceTable::default(),
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_base_url() -> String {
    "https://api.checkout.hostpay.in".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_redirect_base() -> String {
    "https://app.hostpay.in".to_string()
}

fn default_starter_monthly() -> i64 {
    99_900
}

fn default_starter_annual() -> i64 {
    999_900
}

fn default_business_monthly() -> i64 {
    249_900
}

fn default_business_annual() -> i64 {
    2_499_900
}

fn default_enterprise_monthly() -> i64 {
    599_900
}

fn default_enterprise_annual() -> i64 {
    5_999_900
}
