//! Card-gateway request/response hash construction.
//!
//! The gateway authenticates both directions of the exchange with a SHA-512
//! hex digest over a pipe-joined field sequence. The field order and the ten
//! empty placeholder fields between `email` and the salt are the provider's
//! wire contract: changing either breaks interoperability, so both live in
//! exactly one place here and are pinned by tests.
//!
//! Request direction:  `key|txnid|amount|productinfo|firstname|email|||||||||||salt`
//! Response direction: `salt|status|||||||||||email|firstname|productinfo|amount|txnid|key`

use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

/// The fields covered by the gateway hash, in protocol naming.
#[derive(Debug, Clone)]
pub struct HashFields<'a> {
    pub key: &'a str,
    pub txnid: &'a str,
    pub amount: &'a str,
    pub productinfo: &'a str,
    pub firstname: &'a str,
    pub email: &'a str,
}

/// Computes the request-direction hash sent with a payment initiation.
pub fn request_hash(fields: &HashFields<'_>, salt: &str) -> String {
    let payload = format!(
        "{}|{}|{}|{}|{}|{}|||||||||||{}",
        fields.key,
        fields.txnid,
        fields.amount,
        fields.productinfo,
        fields.firstname,
        fields.email,
        salt
    );
    sha512_hex(&payload)
}

/// Computes the response-direction hash the gateway sends with a callback.
///
/// Field order is reversed relative to the request and `status` takes the
/// leading position after the salt.
pub fn response_hash(fields: &HashFields<'_>, status: &str, salt: &str) -> String {
    let payload = format!(
        "{}|{}|||||||||||{}|{}|{}|{}|{}|{}",
        salt,
        status,
        fields.email,
        fields.firstname,
        fields.productinfo,
        fields.amount,
        fields.txnid,
        fields.key
    );
    sha512_hex(&payload)
}

/// Checks a gateway-supplied callback hash against the recomputed value.
///
/// Comparison is constant-time; the supplied hash is case-normalized first
/// because the gateway documents lowercase but some SDKs uppercase it.
pub fn verify_response_hash(
    fields: &HashFields<'_>,
    status: &str,
    salt: &str,
    supplied: &str,
) -> bool {
    let expected = response_hash(fields, status, salt);
    let supplied = supplied.to_lowercase();
    if expected.len() != supplied.len() {
        return false;
    }
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}

fn sha512_hex(payload: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(payload.as_bytes());
    format!("{:x}", hasher.finalize())
}
