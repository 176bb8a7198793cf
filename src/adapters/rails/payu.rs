//! Card-gateway (PayU) rail adapter.
//!
//! Builds the signed form parameters for the gateway's hosted redirect
//! flow. The order id and user id ride along as opaque correlation fields
//! (udf1/udf2 plus redirect query params) so the return leg can be matched
//! back without trusting anything else in the callback.

use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::config::PayuConfig;
use crate::domain::payment::signing::{request_hash, HashFields};
use crate::domain::payment::{Order, PaymentError, PaymentIntent, Rail};
use crate::ports::{RailAdapter, RailResult};

use super::format_amount;

/// PayU rail adapter.
pub struct PayuAdapter {
    config: PayuConfig,
}

impl PayuAdapter {
    pub fn new(config: PayuConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl RailAdapter for PayuAdapter {
    fn rail(&self) -> Rail {
        Rail::Payu
    }

    async fn build(
        &self,
        intent: &PaymentIntent,
        order: &Order,
    ) -> Result<RailResult, PaymentError> {
        if !self.config.is_configured() {
            return Err(PaymentError::not_configured(Rail::Payu));
        }

        let txnid = order
            .provider_ref
            .as_ref()
            .ok_or_else(|| PaymentError::store("order has no transaction reference"))?;

        let amount = format_amount(order.amount_minor);
        let redirect_base = self.config.redirect_base_url.trim_end_matches('/');
        let surl = format!(
            "{}/payment/success?orderId={}&uid={}",
            redirect_base, order.id, order.user_id
        );
        let furl = format!(
            "{}/payment/failure?orderId={}&uid={}",
            redirect_base, order.id, order.user_id
        );

        let hash = request_hash(
            &HashFields {
                key: &self.config.merchant_key,
                txnid: txnid.as_str(),
                amount: &amount,
                productinfo: &intent.product_info,
                firstname: &intent.customer_name,
                email: &intent.email,
            },
            self.config.merchant_salt.expose_secret(),
        );

        let mut params = std::collections::BTreeMap::new();
        params.insert("key".to_string(), self.config.merchant_key.clone());
        params.insert("txnid".to_string(), txnid.as_str().to_string());
        params.insert("amount".to_string(), amount);
        params.insert("productinfo".to_string(), intent.product_info.clone());
        params.insert("firstname".to_string(), intent.customer_name.clone());
        params.insert("email".to_string(), intent.email.clone());
        params.insert(
            "phone".to_string(),
            intent.phone.clone().unwrap_or_default(),
        );
        params.insert("surl".to_string(), surl);
        params.insert("furl".to_string(), furl);
        params.insert("udf1".to_string(), order.id.to_string());
        params.insert("udf2".to_string(), order.user_id.to_string());
        params.insert("hash".to_string(), hash);

        Ok(RailResult::Card {
            payment_url: self.config.base_url.clone(),
            params,
        })
    }
}
