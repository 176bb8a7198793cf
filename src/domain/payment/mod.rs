//! Payment domain: orders, intents, plans, rails, validation, signing.

mod errors;
mod intent;
mod order;
mod plan;
mod rail;
pub mod signing;

pub use errors::{FieldError, PaymentError};
pub use intent::{
    validate_callback, validate_check_status, validate_initiate, CallbackFields, CallbackRequest,
    InitiateFields, PaymentIntent, SignedCallback, MAX_AMOUNT_RUPEES,
};
pub use order::{Order, OrderStatus, SettlementOutcome, TransitionOutcome};
pub use plan::{BillingCycle, Plan};
pub use rail::Rail;
