//! PostgreSQL implementation of the order store.
//!
//! The settlement transition is a conditional UPDATE guarded on
//! `status = 'pending'`, not a read-then-write: two concurrent duplicate
//! success deliveries race on the row, exactly one UPDATE matches, and the
//! loser is reported as already settled.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{OrderId, Timestamp, TxnId, UserId};
use crate::domain::payment::{
    BillingCycle, Order, OrderStatus, PaymentError, Plan, Rail, SettlementOutcome,
    TransitionOutcome,
};
use crate::ports::OrderStore;

/// PostgreSQL order store.
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an order.
///
/// Column names (`amount_cents`, `status`, `plan`) match the platform
/// schema the dashboard reads.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: String,
    plan: String,
    amount_cents: i64,
    status: String,
    billing_cycle: String,
    rail: String,
    provider_ref: Option<String>,
    created_at: DateTime<Utc>,
    paid_at: Option<DateTime<Utc>>,
}

impl TryFrom<OrderRow> for Order {
    type Error = PaymentError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: OrderId::from_uuid(row.id),
            user_id: UserId::new(row.user_id)
                .map_err(|e| PaymentError::store(format!("invalid user_id column: {}", e)))?,
            plan: parse_plan(&row.plan)?,
            amount_minor: row.amount_cents,
            status: parse_status(&row.status)?,
            billing_cycle: parse_billing_cycle(&row.billing_cycle)?,
            rail: parse_rail(&row.rail)?,
            provider_ref: row
                .provider_ref
                .map(TxnId::new)
                .transpose()
                .map_err(|e| PaymentError::store(format!("invalid provider_ref column: {}", e)))?,
            created_at: Timestamp::from_datetime(row.created_at),
            paid_at: row.paid_at.map(Timestamp::from_datetime),
        })
    }
}

fn parse_plan(s: &str) -> Result<Plan, PaymentError> {
    Plan::parse(s).ok_or_else(|| PaymentError::store(format!("invalid plan column: {}", s)))
}

fn parse_status(s: &str) -> Result<OrderStatus, PaymentError> {
    match s {
        "pending" => Ok(OrderStatus::Pending),
        "paid" => Ok(OrderStatus::Paid),
        "failed" => Ok(OrderStatus::Failed),
        _ => Err(PaymentError::store(format!("invalid status column: {}", s))),
    }
}

fn parse_billing_cycle(s: &str) -> Result<BillingCycle, PaymentError> {
    BillingCycle::parse(s)
        .ok_or_else(|| PaymentError::store(format!("invalid billing_cycle column: {}", s)))
}

fn parse_rail(s: &str) -> Result<Rail, PaymentError> {
    Rail::parse(s).ok_or_else(|| PaymentError::store(format!("invalid rail column: {}", s)))
}

fn store_error(context: &str, e: sqlx::Error) -> PaymentError {
    tracing::error!(error = %e, context, "Order store query failed");
    PaymentError::store(context)
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn create(
        &self,
        user_id: UserId,
        plan: Plan,
        amount_minor: i64,
        billing_cycle: BillingCycle,
        rail: Rail,
    ) -> Result<Order, PaymentError> {
        let order = Order::create(user_id, plan, amount_minor, billing_cycle, rail);

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, plan, amount_cents, status, billing_cycle, rail,
                provider_ref, created_at, paid_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.user_id.as_str())
        .bind(order.plan.as_str())
        .bind(order.amount_minor)
        .bind(order.status.as_str())
        .bind(order.billing_cycle.as_str())
        .bind(order.rail.as_str())
        .bind(order.provider_ref.as_ref().map(|r| r.as_str()))
        .bind(order.created_at.as_datetime())
        .bind(order.paid_at.as_ref().map(Timestamp::as_datetime))
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("failed to insert order", e))?;

        Ok(order)
    }

    async fn set_provider_ref(
        &self,
        order_id: OrderId,
        txn_ref: TxnId,
    ) -> Result<(), PaymentError> {
        let result = sqlx::query("UPDATE orders SET provider_ref = $2 WHERE id = $1")
            .bind(order_id.as_uuid())
            .bind(txn_ref.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("failed to set provider ref", e))?;

        if result.rows_affected() == 0 {
            return Err(PaymentError::OrderNotFound(order_id));
        }
        Ok(())
    }

    async fn transition(
        &self,
        order_id: OrderId,
        outcome: SettlementOutcome,
    ) -> Result<TransitionOutcome, PaymentError> {
        let new_status = outcome.as_status();

        // Conditional update: only a pending row can settle. The RETURNING
        // row tells us this call won the race.
        let updated: Option<OrderRow> = sqlx::query_as(
            r#"
            UPDATE orders
            SET status = $2,
                paid_at = CASE WHEN $2 = 'paid' THEN NOW() ELSE paid_at END
            WHERE id = $1 AND status = 'pending'
            RETURNING id, user_id, plan, amount_cents, status, billing_cycle,
                      rail, provider_ref, created_at, paid_at
            "#,
        )
        .bind(order_id.as_uuid())
        .bind(new_status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("failed to transition order", e))?;

        if let Some(row) = updated {
            return Ok(TransitionOutcome::Transitioned(row.try_into()?));
        }

        // No pending row matched: either unknown id or already terminal.
        let existing = self.get(order_id).await?;
        Ok(TransitionOutcome::AlreadySettled(existing))
    }

    async fn get(&self, order_id: OrderId) -> Result<Order, PaymentError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, plan, amount_cents, status, billing_cycle,
                   rail, provider_ref, created_at, paid_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error("failed to fetch order", e))?;

        match row {
            Some(row) => row.try_into(),
            None => Err(PaymentError::OrderNotFound(order_id)),
        }
    }
}
