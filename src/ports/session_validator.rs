//! Session validation port.
//!
//! Turns a bearer credential into an authenticated principal. Runs before
//! any request-body handling: an invalid caller never reaches business
//! logic. Provider-agnostic: the HTTP middleware depends only on this trait.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Port for validating bearer credentials.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validates a raw bearer token and resolves the caller.
    ///
    /// # Errors
    ///
    /// - `InvalidToken` - malformed, bad signature, or unverifiable issuer
    /// - `TokenExpired` - cryptographically valid but past expiry
    /// - `MissingSubject` - valid token with no resolvable subject claim
    /// - `ServiceUnavailable` - the verifier itself failed (transient)
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
