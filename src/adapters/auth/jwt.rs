//! Project-secret JWT adapter for bearer validation.
//!
//! The hosting platform's identity service signs access tokens with a shared
//! project secret (HS256). This adapter implements the `SessionValidator`
//! port by:
//!
//! 1. Decoding the JWT and checking the HMAC signature
//! 2. Validating expiry, and issuer/audience when configured
//! 3. Mapping the subject claim to the domain `AuthenticatedUser`
//!
//! No network calls: the secret is local configuration, so the only failure
//! modes are bad tokens.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Claims we read from a platform access token.
#[derive(Debug, Deserialize)]
struct AccessClaims {
    /// Subject - the user id.
    sub: Option<String>,

    /// Expiry timestamp (validated by jsonwebtoken; kept for completeness).
    #[allow(dead_code)]
    exp: i64,

    /// User's email address, when the platform includes it.
    #[serde(default)]
    email: Option<String>,
}

/// HS256 session validator against the platform's project secret.
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    /// Creates a validator from the auth configuration section.
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_secret(&config.jwt_secret, &config.audience, &config.issuer)
    }

    /// Creates a validator with explicit parameters.
    pub fn with_secret(secret: &SecretString, audience: &str, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if audience.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&[audience]);
        }
        if !issuer.is_empty() {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    tracing::debug!(error = %e, "Token validation failed");
                    AuthError::InvalidToken
                }
            },
        )?;

        let subject = data
            .claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingSubject)?;

        let id = UserId::new(subject).map_err(|_| AuthError::MissingSubject)?;
        Ok(AuthenticatedUser::new(id, data.claims.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[derive(Serialize)]
    struct TestClaims {
        sub: Option<String>,
        exp: i64,
        aud: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    }

    fn sign(claims: &TestClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn validator() -> JwtSessionValidator {
        JwtSessionValidator::with_secret(
            &SecretString::new(SECRET.to_string()),
            "authenticated",
            "",
        )
    }

    fn future_exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[tokio::test]
    async fn valid_token_resolves_user() {
        let token = sign(
            &TestClaims {
                sub: Some("user-123".to_string()),
                exp: future_exp(),
                aud: "authenticated".to_string(),
                email: Some("jane@example.com".to_string()),
            },
            SECRET,
        );

        let user = validator().validate(&token).await.unwrap();
        assert_eq!(user.id.as_str(), "user-123");
        assert_eq!(user.email.as_deref(), Some("jane@example.com"));
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let token = sign(
            &TestClaims {
                sub: Some("user-123".to_string()),
                exp: future_exp(),
                aud: "authenticated".to_string(),
                email: None,
            },
            "another-secret-another-secret-xx",
        );

        let result = validator().validate(&token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn expired_token_is_rejected_distinctly() {
        let token = sign(
            &TestClaims {
                sub: Some("user-123".to_string()),
                exp: chrono::Utc::now().timestamp() - 3600,
                aud: "authenticated".to_string(),
                email: None,
            },
            SECRET,
        );

        let result = validator().validate(&token).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn missing_subject_is_rejected() {
        let token = sign(
            &TestClaims {
                sub: None,
                exp: future_exp(),
                aud: "authenticated".to_string(),
                email: None,
            },
            SECRET,
        );

        let result = validator().validate(&token).await;
        assert!(matches!(result, Err(AuthError::MissingSubject)));
    }

    #[tokio::test]
    async fn wrong_audience_is_rejected() {
        let token = sign(
            &TestClaims {
                sub: Some("user-123".to_string()),
                exp: future_exp(),
                aud: "something-else".to_string(),
                email: None,
            },
            SECRET,
        );

        let result = validator().validate(&token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let result = validator().validate("not.a.jwt").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
