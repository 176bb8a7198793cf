//! PostgreSQL implementation of the entitlement store.
//!
//! Writes the `plan` column on the platform's `profiles` table and appends
//! to `audit_log` and `notifications`. Column names match the schema the
//! dashboard reads; the queries themselves stay minimal.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::UserId;
use crate::domain::payment::{PaymentError, Plan};
use crate::ports::{AuditRecord, EntitlementStore, Notification};

/// PostgreSQL entitlement store.
pub struct PostgresEntitlementStore {
    pool: PgPool,
}

impl PostgresEntitlementStore {
    /// Creates a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn store_error(context: &str, e: sqlx::Error) -> PaymentError {
    tracing::error!(error = %e, context, "Entitlement store query failed");
    PaymentError::store(context)
}

#[async_trait]
impl EntitlementStore for PostgresEntitlementStore {
    async fn set_plan(&self, user_id: &UserId, plan: Plan) -> Result<(), PaymentError> {
        let result = sqlx::query(
            "UPDATE profiles SET plan = $2, updated_at = NOW() WHERE user_id = $1",
        )
        .bind(user_id.as_str())
        .bind(plan.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("failed to update plan entitlement", e))?;

        if result.rows_affected() == 0 {
            // Profile rows are provisioned at signup; a missing one is a
            // data problem worth surfacing, not silently swallowing.
            return Err(PaymentError::store("no profile row for user"));
        }
        Ok(())
    }

    async fn append_audit(
        &self,
        user_id: &UserId,
        record: AuditRecord,
    ) -> Result<(), PaymentError> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (user_id, action, details, created_at)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(user_id.as_str())
        .bind(&record.action)
        .bind(&record.details)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("failed to append audit record", e))?;

        Ok(())
    }

    async fn push_notification(
        &self,
        user_id: &UserId,
        notification: Notification,
    ) -> Result<(), PaymentError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (user_id, kind, title, message, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            "#,
        )
        .bind(user_id.as_str())
        .bind(&notification.kind)
        .bind(&notification.title)
        .bind(&notification.message)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("failed to push notification", e))?;

        Ok(())
    }
}
