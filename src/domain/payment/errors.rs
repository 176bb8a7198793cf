//! Payment-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Validation | 400 |
//! | Forbidden | 403 |
//! | OrderNotFound | 404 |
//! | NotConfigured | 503 |
//! | SignatureMismatch | 200 with `success:false` |
//! | Gateway | 502 |
//! | Store | 500 |
//!
//! Internal detail (store errors, raw gateway bodies) is logged server-side
//! and never surfaced to the client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::OrderId;

use super::Rail;

/// Provider name used when the hosted-checkout provider is unconfigured.
pub const CHECKOUT_PROVIDER: &str = "checkout";

/// One violated field with a human-readable message.
///
/// Validation returns every violated field, not just the first; clients
/// build form feedback around the full list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors raised by the payment core.
#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    /// Request payload failed schema validation.
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Authenticated caller does not own the referenced resource.
    #[error("Caller does not own this order")]
    Forbidden,

    /// No order exists with the given id.
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    /// Merchant credentials for the provider are absent from configuration.
    #[error("Payment provider {0} is not configured")]
    NotConfigured(String),

    /// Callback hash did not match the recomputed value.
    #[error("Callback signature mismatch")]
    SignatureMismatch,

    /// The gateway rejected or failed the outbound request.
    #[error("Gateway error: {message}")]
    Gateway { message: String, retryable: bool },

    /// Durable store failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl PaymentError {
    /// Single-field validation failure.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::Validation(vec![FieldError::new(field, message)])
    }

    /// Unconfigured rail.
    pub fn not_configured(rail: Rail) -> Self {
        PaymentError::NotConfigured(rail.as_str().to_string())
    }

    /// Unconfigured hosted-checkout provider.
    pub fn checkout_not_configured() -> Self {
        PaymentError::NotConfigured(CHECKOUT_PROVIDER.to_string())
    }

    /// Gateway failure worth retrying (network, timeout, 5xx).
    pub fn gateway_retryable(message: impl Into<String>) -> Self {
        PaymentError::Gateway {
            message: message.into(),
            retryable: true,
        }
    }

    /// Gateway failure that will not succeed on retry.
    pub fn gateway(message: impl Into<String>) -> Self {
        PaymentError::Gateway {
            message: message.into(),
            retryable: false,
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        PaymentError::Store(message.into())
    }

    /// Returns true if the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        match self {
            PaymentError::Gateway { retryable, .. } => *retryable,
            PaymentError::Store(_) => true,
            _ => false,
        }
    }
}
