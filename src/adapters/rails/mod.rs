//! Rail adapters: one implementation of the `RailAdapter` port per rail.

mod cashfree;
mod payu;
mod upi;

pub use cashfree::CashfreeAdapter;
pub use payu::PayuAdapter;
pub use upi::UpiAdapter;

use std::sync::Arc;

use crate::config::{CashfreeConfig, PayuConfig, UpiConfig};
use crate::ports::RailRegistry;

/// Formats a minor-unit amount the way the gateways expect: rupees with two
/// decimal places, e.g. `99900 -> "999.00"`.
pub(crate) fn format_amount(amount_minor: i64) -> String {
    format!("{}.{:02}", amount_minor / 100, amount_minor % 100)
}

/// Builds the rail registry from configuration, registering only rails
/// whose credentials are present.
pub fn registry_from_config(
    payu: &PayuConfig,
    upi: &UpiConfig,
    cashfree: &CashfreeConfig,
) -> RailRegistry {
    let mut registry = RailRegistry::new();

    if payu.is_configured() {
        registry.register(Arc::new(PayuAdapter::new(payu.clone())));
    }
    if upi.is_configured() {
        registry.register(Arc::new(UpiAdapter::collect(upi.clone())));
        registry.register(Arc::new(UpiAdapter::gpay(upi.clone())));
    }
    if cashfree.is_configured() {
        registry.register(Arc::new(CashfreeAdapter::new(cashfree.clone())));
    }

    registry
}
