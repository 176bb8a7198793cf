//! Authentication types for the domain layer.
//!
//! These types represent an authenticated caller extracted from a verified
//! bearer credential. They have **no external dependencies** - any identity
//! provider can populate them via the `SessionValidator` port.
//!
//! The verified subject claim is the only trusted source of "who is making
//! this request". A `userId` appearing in a request body is only ever
//! compared against it for equality, never substituted for it.

use super::UserId;
use thiserror::Error;

/// Authenticated caller extracted from a validated bearer token.
///
/// This is a **domain type** with no provider dependencies.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the token's subject claim.
    pub id: UserId,

    /// User's email address from the token claims, when present.
    pub email: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    ///
    /// Typically called by the `SessionValidator` adapter after successfully
    /// validating a bearer token.
    pub fn new(id: UserId, email: Option<String>) -> Self {
        Self { id, email }
    }

    /// Compares a client-supplied user id against the verified identity.
    ///
    /// Guard clause for handlers that accept a `userId` body field: the
    /// field must match the credential's subject exactly.
    pub fn is_same_user(&self, claimed: &str) -> bool {
        self.id.as_str() == claimed
    }
}

/// Authentication errors that can occur during token validation.
///
/// These errors are **domain-centric** - they describe what went wrong from
/// the application's perspective, not the identity provider's.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// The token is valid but carries no resolvable subject claim.
    #[error("Token has no subject")]
    MissingSubject,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the caller should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::MissingSubject
        )
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
