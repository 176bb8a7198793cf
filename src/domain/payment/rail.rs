//! Payment rail definitions.
//!
//! A rail is an external processor with its own request/callback shape.
//! The set is closed: orchestration dispatches on this enum at exactly one
//! point, so adding a rail means adding one variant and one adapter.

use serde::{Deserialize, Serialize};

/// Payment rail through which an order is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rail {
    /// Card gateway (PayU-style hosted redirect with request signing).
    Payu,

    /// UPI collect via scannable QR / app intent URI.
    Upi,

    /// Google Pay deep link (UPI parameters under the wallet scheme).
    Gpay,

    /// Alternate gateway (Cashfree-style server-created order + redirect).
    Cashfree,
}

impl Rail {
    /// Parses a rail name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "payu" => Some(Rail::Payu),
            "upi" => Some(Rail::Upi),
            "gpay" => Some(Rail::Gpay),
            "cashfree" => Some(Rail::Cashfree),
            _ => None,
        }
    }

    /// Returns the wire/store name for this rail.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rail::Payu => "payu",
            Rail::Upi => "upi",
            Rail::Gpay => "gpay",
            Rail::Cashfree => "cashfree",
        }
    }

    /// Returns true if callbacks on this rail carry a verifiable signature.
    ///
    /// UPI/GPay collect flows have no shared-secret callback signature; the
    /// polling path is the source of truth there.
    pub fn has_signed_callback(&self) -> bool {
        matches!(self, Rail::Payu)
    }
}

impl std::fmt::Display for Rail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_rails() {
        assert_eq!(Rail::parse("payu"), Some(Rail::Payu));
        assert_eq!(Rail::parse("UPI"), Some(Rail::Upi));
        assert_eq!(Rail::parse("gpay"), Some(Rail::Gpay));
        assert_eq!(Rail::parse("cashfree"), Some(Rail::Cashfree));
    }

    #[test]
    fn parse_rejects_unknown_rails() {
        assert_eq!(Rail::parse("paypal"), None);
        assert_eq!(Rail::parse(""), None);
    }

    #[test]
    fn only_card_gateway_has_signed_callback() {
        assert!(Rail::Payu.has_signed_callback());
        assert!(!Rail::Upi.has_signed_callback());
        assert!(!Rail::Gpay.has_signed_callback());
        assert!(!Rail::Cashfree.has_signed_callback());
    }

    #[test]
    fn rail_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Rail::Gpay).unwrap(), "\"gpay\"");
    }
}
