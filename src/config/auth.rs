//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Minimum accepted length for the JWT signing secret.
const MIN_JWT_SECRET_LEN: usize = 32;

/// Authentication configuration (project-secret JWT)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret the identity platform signs access tokens with
    pub jwt_secret: SecretString,

    /// Expected audience claim; empty disables the audience check
    #[serde(default = "default_audience")]
    pub audience: String,

    /// Expected issuer claim; empty disables the issuer check
    #[serde(default)]
    pub issuer: String,
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_JWT_SECRET"));
        }
        if self.jwt_secret.expose_secret().len() < MIN_JWT_SECRET_LEN {
            return Err(ValidationError::JwtSecretTooShort);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::new(String::new()),
            audience: default_audience(),
            issuer: String::new(),
        }
    }
}

fn default_audience() -> String {
    "authenticated".to_string()
}
