//! Entitlement store port.
//!
//! Applies the subscription side effects of a successful payment: the plan
//! field on the user profile, one audit record, one user-facing
//! notification. At-most-once execution per order is guaranteed upstream by
//! the order store's transition semantics; implementations here do not
//! re-check it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;
use crate::domain::payment::{PaymentError, Plan};

/// Audit trail entry describing a state-changing action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Action name, e.g. `plan_upgraded`.
    pub action: String,

    /// Structured details (rail, order id, amount).
    pub details: serde_json::Value,
}

impl AuditRecord {
    pub fn new(action: impl Into<String>, details: serde_json::Value) -> Self {
        Self {
            action: action.into(),
            details,
        }
    }
}

/// User-facing notification appended on payment success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Notification kind, e.g. `payment`.
    pub kind: String,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(
        kind: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Port for user profile entitlements and their bookkeeping.
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    /// Sets the user's plan entitlement.
    async fn set_plan(&self, user_id: &UserId, plan: Plan) -> Result<(), PaymentError>;

    /// Appends one audit record for the user.
    async fn append_audit(&self, user_id: &UserId, record: AuditRecord)
        -> Result<(), PaymentError>;

    /// Enqueues one user-facing notification.
    async fn push_notification(
        &self,
        user_id: &UserId,
        notification: Notification,
    ) -> Result<(), PaymentError>;
}
