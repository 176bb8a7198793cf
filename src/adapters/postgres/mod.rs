//! PostgreSQL store adapters.

mod entitlement_store;
mod order_store;

pub use entitlement_store::PostgresEntitlementStore;
pub use order_store::PostgresOrderStore;
