//! Payment command/query handlers.

mod check_status;
mod create_checkout_session;
mod grant_entitlement;
mod initiate_payment;
mod verify_payment;

pub use check_status::{CheckStatusHandler, CheckStatusQuery, CheckStatusResult};
pub use create_checkout_session::{CreateCheckoutSessionCommand, CreateCheckoutSessionHandler};
pub use grant_entitlement::GrantEntitlementHandler;
pub use initiate_payment::{InitiatePaymentCommand, InitiatePaymentHandler, InitiatePaymentResult};
pub use verify_payment::{VerifyPaymentCommand, VerifyPaymentHandler, VerifyPaymentResult};
