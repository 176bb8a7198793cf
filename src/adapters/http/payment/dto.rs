//! Wire DTOs for the payment endpoints.
//!
//! Request DTOs deserialize leniently (everything optional) so the domain
//! validator can report every violated field at once instead of serde
//! failing on the first. Response field names are the dashboard's existing
//! camelCase contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::payment::{CallbackFields, FieldError, InitiateFields, Order};
use crate::ports::{CheckoutSession, RailResult};

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /indian-payment`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndianPaymentRequest {
    pub action: Option<String>,

    // initiate
    pub provider: Option<String>,
    pub amount: Option<f64>,
    pub product_info: Option<String>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub plan: Option<String>,
    pub billing_cycle: Option<String>,

    // verify / check_status
    pub order_id: Option<String>,
    pub status: Option<String>,
    pub txn_id: Option<String>,
}

impl IndianPaymentRequest {
    pub fn initiate_fields(&self) -> InitiateFields {
        InitiateFields {
            provider: self.provider.clone(),
            amount: self.amount,
            product_info: self.product_info.clone(),
            customer_name: self.customer_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            plan: self.plan.clone(),
            billing_cycle: self.billing_cycle.clone(),
        }
    }

    pub fn callback_fields(&self) -> CallbackFields {
        CallbackFields {
            order_id: self.order_id.clone(),
            status: self.status.clone(),
            txnid: self.txn_id.clone(),
            ..Default::default()
        }
    }
}

/// Body of `POST /payu-payment`.
///
/// The verify leg relays the gateway's raw callback field names (`txnid`,
/// `mihpayid`, `hash`, `udf1`, ...); the initiate leg matches the general
/// endpoint minus `provider`. `amount` arrives as a JSON number on initiate
/// and as the gateway's string on verify, hence the loose value type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayuPaymentRequest {
    pub action: Option<String>,

    // initiate (camelCase like the general endpoint)
    pub amount: Option<serde_json::Value>,
    #[serde(rename = "productInfo")]
    pub product_info: Option<String>,
    #[serde(rename = "customerName")]
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub plan: Option<String>,
    #[serde(rename = "billingCycle")]
    pub billing_cycle: Option<String>,

    // verify (raw gateway callback names)
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
    pub status: Option<String>,
    pub txnid: Option<String>,
    pub mihpayid: Option<String>,
    pub hash: Option<String>,
    pub productinfo: Option<String>,
    pub firstname: Option<String>,
    pub udf1: Option<String>,
    pub udf2: Option<String>,
}

impl PayuPaymentRequest {
    pub fn initiate_fields(&self) -> InitiateFields {
        InitiateFields {
            // Endpoint is gateway-specific; the rail is implicit.
            provider: Some("payu".to_string()),
            amount: self.amount.as_ref().and_then(amount_as_f64),
            product_info: self.product_info.clone(),
            customer_name: self.customer_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            plan: self.plan.clone(),
            billing_cycle: self.billing_cycle.clone(),
        }
    }

    pub fn callback_fields(&self) -> CallbackFields {
        CallbackFields {
            // udf1 carried the order id through the gateway round trip.
            order_id: self.order_id.clone().or_else(|| self.udf1.clone()),
            status: self.status.clone(),
            txnid: self.txnid.clone(),
            amount: self.amount.as_ref().and_then(amount_as_string),
            productinfo: self.productinfo.clone(),
            firstname: self.firstname.clone(),
            email: self.email.clone(),
            hash: self.hash.clone(),
            mihpayid: self.mihpayid.clone(),
        }
    }
}

fn amount_as_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn amount_as_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Body of `POST /create-checkout-session`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    pub user_id: Option<String>,
    pub plan_name: Option<String>,
    pub billing_cycle: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

/// Response of a successful `initiate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateResponse {
    pub success: bool,
    pub provider: String,
    pub order_id: String,
    pub txn_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpay_deep_link: Option<String>,
}

impl InitiateResponse {
    pub fn from_result(order: &Order, rail_result: RailResult) -> Self {
        let mut response = Self {
            success: true,
            provider: order.rail.as_str().to_string(),
            order_id: order.id.to_string(),
            txn_id: order
                .provider_ref
                .as_ref()
                .map(|r| r.as_str().to_string())
                .unwrap_or_default(),
            payment_url: None,
            params: None,
            upi_url: None,
            qr_data: None,
            gpay_deep_link: None,
        };

        match rail_result {
            RailResult::Card {
                payment_url,
                params,
            } => {
                response.payment_url = Some(payment_url);
                response.params = Some(params);
            }
            RailResult::Upi {
                upi_uri,
                qr_payload,
                gpay_deep_link,
            } => {
                response.upi_url = Some(upi_uri);
                response.qr_data = Some(qr_payload);
                response.gpay_deep_link = gpay_deep_link;
            }
            RailResult::Gateway {
                gateway_order_id,
                payment_url,
            } => {
                response.payment_url = Some(payment_url);
                response.txn_id = gateway_order_id;
            }
        }

        response
    }
}

/// Response of `verify`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub order_id: String,
    pub provider: String,
    pub status: String,
}

/// Response of `check_status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatusResponse {
    pub success: bool,
    pub status: String,
    pub paid: bool,
    pub order_id: String,
}

impl CheckStatusResponse {
    pub fn from_order(order: &Order, paid: bool) -> Self {
        Self {
            success: true,
            status: order.status.as_str().to_string(),
            paid,
            order_id: order.id.to_string(),
        }
    }
}

/// Response of `POST /create-checkout-session`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    pub session_id: String,
    pub url: String,
}

impl From<CheckoutSession> for CheckoutSessionResponse {
    fn from(session: CheckoutSession) -> Self {
        Self {
            session_id: session.session_id,
            url: session.url,
        }
    }
}

/// Error body shared by all endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
            fields: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldError>) -> Self {
        self.fields = Some(fields);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{TxnId, UserId};
    use crate::domain::payment::{BillingCycle, Plan, Rail};

    fn order_with_ref(rail: Rail) -> Order {
        let mut order = Order::create(
            UserId::new("user-1").unwrap(),
            Plan::Starter,
            99_900,
            BillingCycle::Monthly,
            rail,
        );
        order.provider_ref = Some(TxnId::new("TXN1").unwrap());
        order
    }

    #[test]
    fn initiate_response_serializes_camel_case_upi_fields() {
        let order = order_with_ref(Rail::Upi);
        let response = InitiateResponse::from_result(
            &order,
            RailResult::Upi {
                upi_uri: "upi://pay?pa=x".to_string(),
                qr_payload: "upi://pay?pa=x".to_string(),
                gpay_deep_link: None,
            },
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["provider"], "upi");
        assert_eq!(json["upiUrl"], "upi://pay?pa=x");
        assert_eq!(json["qrData"], "upi://pay?pa=x");
        assert!(json.get("paymentUrl").is_none());
        assert!(json.get("gpayDeepLink").is_none());
        assert_eq!(json["txnId"], "TXN1");
    }

    #[test]
    fn initiate_response_carries_card_params() {
        let order = order_with_ref(Rail::Payu);
        let mut params = BTreeMap::new();
        params.insert("key".to_string(), "k".to_string());

        let response = InitiateResponse::from_result(
            &order,
            RailResult::Card {
                payment_url: "https://secure.payu.in/_payment".to_string(),
                params,
            },
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["paymentUrl"], "https://secure.payu.in/_payment");
        assert_eq!(json["params"]["key"], "k");
        assert!(json.get("upiUrl").is_none());
    }

    #[test]
    fn gateway_result_overrides_txn_id_with_gateway_order() {
        let order = order_with_ref(Rail::Cashfree);
        let response = InitiateResponse::from_result(
            &order,
            RailResult::Gateway {
                gateway_order_id: "cf_123".to_string(),
                payment_url: "https://pay.example/x".to_string(),
            },
        );

        assert_eq!(response.txn_id, "cf_123");
        assert_eq!(response.payment_url.as_deref(), Some("https://pay.example/x"));
    }

    #[test]
    fn indian_request_maps_to_initiate_fields() {
        let body: IndianPaymentRequest = serde_json::from_value(serde_json::json!({
            "action": "initiate",
            "provider": "upi",
            "amount": 999,
            "productInfo": "Starter Plan",
            "customerName": "Jane",
            "email": "jane@example.com",
            "plan": "starter"
        }))
        .unwrap();

        let fields = body.initiate_fields();
        assert_eq!(fields.provider.as_deref(), Some("upi"));
        assert_eq!(fields.amount, Some(999.0));
        assert_eq!(fields.customer_name.as_deref(), Some("Jane"));
    }

    #[test]
    fn payu_request_accepts_raw_callback_names() {
        let body: PayuPaymentRequest = serde_json::from_value(serde_json::json!({
            "action": "verify",
            "txnid": "TXN1",
            "mihpayid": "403993715531047445",
            "status": "success",
            "hash": "ab12",
            "amount": "100.00",
            "productinfo": "Business Plan",
            "firstname": "Jane",
            "email": "jane@example.com",
            "udf1": "3b4b84f1-8b86-4a77-9b38-daeb8e0f3dcf"
        }))
        .unwrap();

        let fields = body.callback_fields();
        assert_eq!(fields.txnid.as_deref(), Some("TXN1"));
        assert_eq!(fields.amount.as_deref(), Some("100.00"));
        assert_eq!(
            fields.order_id.as_deref(),
            Some("3b4b84f1-8b86-4a77-9b38-daeb8e0f3dcf")
        );
        assert_eq!(fields.mihpayid.as_deref(), Some("403993715531047445"));
    }

    #[test]
    fn payu_initiate_parses_numeric_or_string_amount() {
        let numeric: PayuPaymentRequest =
            serde_json::from_value(serde_json::json!({"amount": 999})).unwrap();
        assert_eq!(numeric.initiate_fields().amount, Some(999.0));

        let string: PayuPaymentRequest =
            serde_json::from_value(serde_json::json!({"amount": "999"})).unwrap();
        assert_eq!(string.initiate_fields().amount, Some(999.0));
    }

    #[test]
    fn error_response_serializes_field_list() {
        let response = ErrorResponse::new("VALIDATION_FAILED", "Validation failed")
            .with_fields(vec![FieldError::new("amount", "must be positive")]);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["fields"][0]["field"], "amount");
    }
}
