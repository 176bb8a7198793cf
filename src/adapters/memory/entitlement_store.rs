//! In-memory implementation of the entitlement store.
//!
//! Records plan assignments, audit records, and notifications so tests can
//! assert side effects fired exactly once.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::payment::{PaymentError, Plan};
use crate::ports::{AuditRecord, EntitlementStore, Notification};

/// In-memory entitlement store.
#[derive(Debug, Default)]
pub struct InMemoryEntitlementStore {
    plans: Mutex<HashMap<String, Plan>>,
    audits: Mutex<Vec<(String, AuditRecord)>>,
    notifications: Mutex<Vec<(String, Notification)>>,
}

impl InMemoryEntitlementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current plan for a user, if any; test helper.
    pub fn plan_of(&self, user_id: &UserId) -> Option<Plan> {
        self.plans.lock().unwrap().get(user_id.as_str()).copied()
    }

    /// Number of audit records appended for a user; test helper.
    pub fn audit_count(&self, user_id: &UserId) -> usize {
        self.audits
            .lock()
            .unwrap()
            .iter()
            .filter(|(uid, _)| uid == user_id.as_str())
            .count()
    }

    /// Number of notifications pushed for a user; test helper.
    pub fn notification_count(&self, user_id: &UserId) -> usize {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|(uid, _)| uid == user_id.as_str())
            .count()
    }

    /// Last audit record appended for a user; test helper.
    pub fn last_audit(&self, user_id: &UserId) -> Option<AuditRecord> {
        self.audits
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(uid, _)| uid == user_id.as_str())
            .map(|(_, record)| record.clone())
    }
}

#[async_trait]
impl EntitlementStore for InMemoryEntitlementStore {
    async fn set_plan(&self, user_id: &UserId, plan: Plan) -> Result<(), PaymentError> {
        self.plans
            .lock()
            .unwrap()
            .insert(user_id.as_str().to_string(), plan);
        Ok(())
    }

    async fn append_audit(
        &self,
        user_id: &UserId,
        record: AuditRecord,
    ) -> Result<(), PaymentError> {
        self.audits
            .lock()
            .unwrap()
            .push((user_id.as_str().to_string(), record));
        Ok(())
    }

    async fn push_notification(
        &self,
        user_id: &UserId,
        notification: Notification,
    ) -> Result<(), PaymentError> {
        self.notifications
            .lock()
            .unwrap()
            .push((user_id.as_str().to_string(), notification));
        Ok(())
    }
}
