//! UPI collect / wallet deep-link rail adapter.
//!
//! No signature on this rail: the adapter constructs a payment URI of the
//! form `upi://pay?pa=..&pn=..&am=..&cu=INR&tn=..&tr=..`. The same string is
//! reused as the scannable QR payload and the app-launch URI. The wallet
//! variant adds a deep link with identical parameters under the wallet's own
//! scheme.

use async_trait::async_trait;
use url::Url;

use crate::config::UpiConfig;
use crate::domain::payment::{Order, PaymentError, PaymentIntent, Rail};
use crate::ports::{RailAdapter, RailResult};

use super::format_amount;

/// Wallet deep-link scheme used by the GPay variant.
const GPAY_SCHEME_BASE: &str = "tez://upi/pay";

/// UPI intent scheme shared by all UPI apps.
const UPI_SCHEME_BASE: &str = "upi://pay";

/// UPI rail adapter, serving both the generic collect flow and the
/// wallet-deep-link variant.
pub struct UpiAdapter {
    config: UpiConfig,
    rail: Rail,
}

impl UpiAdapter {
    /// Generic UPI collect adapter.
    pub fn collect(config: UpiConfig) -> Self {
        Self {
            config,
            rail: Rail::Upi,
        }
    }

    /// GPay deep-link variant: same parameters, extra wallet-scheme link.
    pub fn gpay(config: UpiConfig) -> Self {
        Self {
            config,
            rail: Rail::Gpay,
        }
    }

    fn payment_uri(
        &self,
        base: &str,
        intent: &PaymentIntent,
        order: &Order,
        txn_ref: &str,
    ) -> Result<String, PaymentError> {
        let uri = Url::parse_with_params(
            base,
            &[
                ("pa", self.config.payee_vpa.as_str()),
                ("pn", self.config.merchant_name.as_str()),
                ("am", &format_amount(order.amount_minor)),
                ("cu", "INR"),
                ("tn", intent.product_info.as_str()),
                ("tr", txn_ref),
            ],
        )
        .map_err(|e| PaymentError::gateway(format!("failed to build UPI URI: {}", e)))?;
        Ok(uri.to_string())
    }
}

#[async_trait]
impl RailAdapter for UpiAdapter {
    fn rail(&self) -> Rail {
        self.rail
    }

    async fn build(
        &self,
        intent: &PaymentIntent,
        order: &Order,
    ) -> Result<RailResult, PaymentError> {
        if !self.config.is_configured() {
            return Err(PaymentError::not_configured(self.rail));
        }

        let txn_ref = order
            .provider_ref
            .as_ref()
            .ok_or_else(|| PaymentError::store("order has no transaction reference"))?
            .as_str()
            .to_string();

        let upi_uri = self.payment_uri(UPI_SCHEME_BASE, intent, order, &txn_ref)?;
        let gpay_deep_link = if self.rail == Rail::Gpay {
            Some(self.payment_uri(GPAY_SCHEME_BASE, intent, order, &txn_ref)?)
        } else {
            None
        };

        Ok(RailResult::Upi {
            qr_payload: upi_uri.clone(),
            upi_uri,
            gpay_deep_link,
        })
    }
}
