//! Card-gateway (PayU) merchant configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// PayU merchant configuration
///
/// Both credentials empty means the rail is simply not offered; an initiate
/// call for it fails fast with a not-configured error instead of producing a
/// broken payment link.
#[derive(Debug, Clone, Deserialize)]
pub struct PayuConfig {
    /// Merchant key (appears in the payment form, not secret)
    #[serde(default)]
    pub merchant_key: String,

    /// Merchant salt used in request/response hashing
    #[serde(default = "empty_secret")]
    pub merchant_salt: SecretString,

    /// Hosted payment endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL the success/failure redirects point back to
    #[serde(default = "default_redirect_base")]
    pub redirect_base_url: String,
}

impl PayuConfig {
    /// True when both merchant credentials are present.
    pub fn is_configured(&self) -> bool {
        !self.merchant_key.is_empty() && !self.merchant_salt.expose_secret().is_empty()
    }

    /// Validate PayU configuration
    ///
    /// Credentials are all-or-nothing; a key without a salt (or vice versa)
    /// is a broken deploy, not an unconfigured rail.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let has_key = !self.merchant_key.is_empty();
        let has_salt = !self.merchant_salt.expose_secret().is_empty();
        if has_key != has_salt {
            return Err(ValidationError::MissingRequired(
                "PAYU_MERCHANT_KEY / PAYU_MERCHANT_SALT",
            ));
        }
        Ok(())
    }
}

impl Default for PayuConfig {
    fn default() -> Self {
        Self {
            merchant_key: String::new(),
            merchant_salt: empty_secret(),
            base_url: default_base_url(),
            redirect_base_url: default_redirect_base(),
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_base_url() -> String {
    "https://secure.payu.in/_payment".to_string()
}

fn default_redirect_base() -> String {
    "https://app.hostpay.in".to_string()
}
