//! Payment intent construction and per-action request validation.
//!
//! Each endpoint action has one validation function that checks every field
//! and returns **all** violations, not just the first; clients render form
//! feedback from the full list. Validation is pure: no store lookups, no
//! clock, no configuration reads.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::foundation::OrderId;

use super::{BillingCycle, FieldError, Plan, Rail};

/// Upper bound on the rupee amount a caller may submit.
pub const MAX_AMOUNT_RUPEES: f64 = 10_000_000.0;

/// Upper bound on free-text fields (product info, customer name).
const MAX_TEXT_LEN: usize = 255;

/// Upper bound on id-ish string fields arriving from callbacks.
const MAX_REF_LEN: usize = 64;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+91)?[6-9][0-9]{9}$").expect("valid phone regex"));

/// Validated request to start a payment. Transient, never persisted as-is.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub rail: Rail,
    /// Amount in minor units (paise), derived once from the caller's rupee
    /// amount. Adapters format from this value only.
    pub amount_minor: i64,
    pub product_info: String,
    pub customer_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub plan: Plan,
    pub billing_cycle: BillingCycle,
}

/// Raw `initiate` fields as they arrive off the wire, before validation.
#[derive(Debug, Clone, Default)]
pub struct InitiateFields {
    pub provider: Option<String>,
    pub amount: Option<f64>,
    pub product_info: Option<String>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub plan: Option<String>,
    pub billing_cycle: Option<String>,
}

/// Raw `verify` fields as they arrive off the wire, before validation.
///
/// The signature block uses the card gateway's own callback field names;
/// rails without signed callbacks leave it empty.
#[derive(Debug, Clone, Default)]
pub struct CallbackFields {
    pub order_id: Option<String>,
    pub status: Option<String>,
    pub txnid: Option<String>,
    pub amount: Option<String>,
    pub productinfo: Option<String>,
    pub firstname: Option<String>,
    pub email: Option<String>,
    pub hash: Option<String>,
    pub mihpayid: Option<String>,
}

/// Validated `verify` request.
#[derive(Debug, Clone)]
pub struct CallbackRequest {
    pub order_id: OrderId,
    /// Provider-reported status, mapped to a terminal outcome (or left
    /// pending) by the verification handler.
    pub provider_status: String,
    /// Present when the caller supplied the card gateway's signed fields.
    pub signature: Option<SignedCallback>,
}

/// The card gateway's signed callback fields, all present together.
#[derive(Debug, Clone)]
pub struct SignedCallback {
    pub txnid: String,
    pub amount: String,
    pub productinfo: String,
    pub firstname: String,
    pub email: String,
    pub hash: String,
    pub mihpayid: Option<String>,
}

/// Validates an `initiate` request into a [`PaymentIntent`].
///
/// `allowed_rails` is the closed set the invoking endpoint accepts: the
/// multi-rail endpoint passes all rails, the card-gateway endpoint only its
/// own.
pub fn validate_initiate(
    fields: &InitiateFields,
    allowed_rails: &[Rail],
) -> Result<PaymentIntent, Vec<FieldError>> {
    let mut errors = Vec::new();

    let rail = match fields.provider.as_deref() {
        None => {
            errors.push(FieldError::new("provider", "provider is required"));
            None
        }
        Some(raw) => match Rail::parse(raw) {
            Some(rail) if allowed_rails.contains(&rail) => Some(rail),
            Some(_) | None => {
                errors.push(FieldError::new(
                    "provider",
                    "provider is not supported on this endpoint",
                ));
                None
            }
        },
    };

    let amount_minor = validate_amount(fields.amount, &mut errors);

    let plan = match fields.plan.as_deref() {
        None => {
            errors.push(FieldError::new("plan", "plan is required"));
            None
        }
        Some(raw) => match Plan::parse(raw) {
            Some(plan) => Some(plan),
            None => {
                errors.push(FieldError::new("plan", "unknown plan"));
                None
            }
        },
    };

    let billing_cycle = match fields.billing_cycle.as_deref() {
        None => Some(BillingCycle::default()),
        Some(raw) => match BillingCycle::parse(raw) {
            Some(cycle) => Some(cycle),
            None => {
                errors.push(FieldError::new("billingCycle", "unknown billing cycle"));
                None
            }
        },
    };

    let email = validate_email(fields.email.as_deref(), &mut errors);
    let phone = validate_phone(fields.phone.as_deref(), &mut errors);

    let customer_name = match fields.customer_name.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(FieldError::new("customerName", "customer name is required"));
            None
        }
        Some(name) if name.len() > MAX_TEXT_LEN => {
            errors.push(FieldError::new("customerName", "customer name is too long"));
            None
        }
        Some(name) => Some(name.to_string()),
    };

    let product_info = match fields.product_info.as_deref().map(str::trim) {
        Some(info) if info.len() > MAX_TEXT_LEN => {
            errors.push(FieldError::new("productInfo", "product info is too long"));
            None
        }
        Some(info) if !info.is_empty() => Some(info.to_string()),
        // Absent or blank: derive from the plan once it parsed.
        _ => plan.map(|p| format!("{} Plan", p.display_name())),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    // All unwraps guarded by the empty error list above.
    Ok(PaymentIntent {
        rail: rail.unwrap(),
        amount_minor: amount_minor.unwrap(),
        product_info: product_info.unwrap(),
        customer_name: customer_name.unwrap(),
        email: email.unwrap(),
        phone,
        plan: plan.unwrap(),
        billing_cycle: billing_cycle.unwrap(),
    })
}

/// Validates a `verify` request into a [`CallbackRequest`].
///
/// The signature block is all-or-nothing: supplying a hash without the
/// fields it covers (or vice versa) is a validation failure, while omitting
/// the whole block is the legitimate unsigned-rail shape.
pub fn validate_callback(fields: &CallbackFields) -> Result<CallbackRequest, Vec<FieldError>> {
    let mut errors = Vec::new();

    let order_id = validate_order_id(fields.order_id.as_deref(), &mut errors);

    let provider_status = match fields.status.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push(FieldError::new("status", "status is required"));
            None
        }
        Some(s) if s.len() > MAX_REF_LEN => {
            errors.push(FieldError::new("status", "status is too long"));
            None
        }
        Some(s) => Some(s.to_string()),
    };

    let any_signed = fields.hash.is_some()
        || fields.txnid.is_some()
        || fields.amount.is_some()
        || fields.productinfo.is_some()
        || fields.firstname.is_some()
        || fields.email.is_some();

    let signature = if any_signed {
        build_signed_callback(fields, &mut errors)
    } else {
        None
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CallbackRequest {
        order_id: order_id.unwrap(),
        provider_status: provider_status.unwrap(),
        signature,
    })
}

/// Validates a `check_status` request into an [`OrderId`].
pub fn validate_check_status(order_id: Option<&str>) -> Result<OrderId, Vec<FieldError>> {
    let mut errors = Vec::new();
    match validate_order_id(order_id, &mut errors) {
        Some(id) => Ok(id),
        None => Err(errors),
    }
}

fn validate_amount(amount: Option<f64>, errors: &mut Vec<FieldError>) -> Option<i64> {
    match amount {
        None => {
            errors.push(FieldError::new("amount", "amount is required"));
            None
        }
        Some(a) if !a.is_finite() => {
            errors.push(FieldError::new("amount", "amount must be a number"));
            None
        }
        Some(a) if a <= 0.0 => {
            errors.push(FieldError::new("amount", "amount must be positive"));
            None
        }
        Some(a) if a > MAX_AMOUNT_RUPEES => {
            errors.push(FieldError::new("amount", "amount exceeds the maximum"));
            None
        }
        Some(a) => Some((a * 100.0).round() as i64),
    }
}

fn validate_email(email: Option<&str>, errors: &mut Vec<FieldError>) -> Option<String> {
    match email.map(str::trim) {
        None | Some("") => {
            errors.push(FieldError::new("email", "email is required"));
            None
        }
        Some(e) if e.len() > MAX_TEXT_LEN || !EMAIL_RE.is_match(e) => {
            errors.push(FieldError::new("email", "email has invalid format"));
            None
        }
        Some(e) => Some(e.to_string()),
    }
}

/// Optional field: absent or blank passes as "not provided".
fn validate_phone(phone: Option<&str>, errors: &mut Vec<FieldError>) -> Option<String> {
    let stripped: String = phone
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if stripped.is_empty() {
        return None;
    }
    if PHONE_RE.is_match(&stripped) {
        Some(stripped)
    } else {
        errors.push(FieldError::new(
            "phone",
            "phone must be a valid Indian mobile number",
        ));
        None
    }
}

fn validate_order_id(order_id: Option<&str>, errors: &mut Vec<FieldError>) -> Option<OrderId> {
    match order_id.map(str::trim) {
        None | Some("") => {
            errors.push(FieldError::new("orderId", "orderId is required"));
            None
        }
        Some(raw) if raw.len() > MAX_REF_LEN => {
            errors.push(FieldError::new("orderId", "orderId is too long"));
            None
        }
        Some(raw) => match raw.parse::<OrderId>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.push(FieldError::new("orderId", "orderId is malformed"));
                None
            }
        },
    }
}

fn build_signed_callback(
    fields: &CallbackFields,
    errors: &mut Vec<FieldError>,
) -> Option<SignedCallback> {
    let mut missing = Vec::new();
    let mut require = |name: &'static str, value: &Option<String>| -> Option<String> {
        match value.as_deref().map(str::trim) {
            None | Some("") => {
                missing.push(name);
                None
            }
            Some(v) if v.len() > MAX_TEXT_LEN => {
                errors.push(FieldError::new(name, "field is too long"));
                None
            }
            Some(v) => Some(v.to_string()),
        }
    };

    let txnid = require("txnid", &fields.txnid);
    let amount = require("amount", &fields.amount);
    let productinfo = require("productinfo", &fields.productinfo);
    let firstname = require("firstname", &fields.firstname);
    let email = require("email", &fields.email);
    let hash = require("hash", &fields.hash);

    for name in &missing {
        errors.push(FieldError::new(
            *name,
            "required when signed callback fields are present",
        ));
    }

    match (txnid, amount, productinfo, firstname, email, hash) {
        (Some(txnid), Some(amount), Some(productinfo), Some(firstname), Some(email), Some(hash)) => {
            Some(SignedCallback {
                txnid,
                amount,
                productinfo,
                firstname,
                email,
                hash,
                mihpayid: fields.mihpayid.clone(),
            })
        }
        _ => None,
    }
}
