//! VerifyPaymentHandler - command handler for provider result callbacks.
//!
//! Order of checks is load-bearing: validate the payload shape, load the
//! order, enforce ownership, re-derive the callback signature where the rail
//! has one, and only then map the provider status onto a settlement. A
//! pending/unknown provider status mutates nothing.

use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::config::PayuConfig;
use crate::domain::foundation::AuthenticatedUser;
use crate::domain::payment::signing::{verify_response_hash, HashFields};
use crate::domain::payment::{
    validate_callback, CallbackFields, Order, OrderStatus, PaymentError, Rail, SettlementOutcome,
    SignedCallback,
};
use crate::ports::OrderStore;

use super::GrantEntitlementHandler;

/// Command to verify a provider result.
#[derive(Debug, Clone)]
pub struct VerifyPaymentCommand {
    /// Authenticated caller; must own the referenced order.
    pub principal: AuthenticatedUser,
    /// Raw callback fields, not yet validated.
    pub fields: CallbackFields,
}

/// Result of processing a verify call.
#[derive(Debug, Clone)]
pub struct VerifyPaymentResult {
    pub order: Order,
    /// True when the provider reported success (whether this call settled
    /// the order or an earlier delivery already had).
    pub paid: bool,
    /// True when the provider status was still in flight; nothing changed.
    pub pending: bool,
}

/// Handler for payment verification callbacks.
pub struct VerifyPaymentHandler {
    orders: Arc<dyn OrderStore>,
    entitlements: GrantEntitlementHandler,
    payu: PayuConfig,
}

impl VerifyPaymentHandler {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        entitlements: GrantEntitlementHandler,
        payu: PayuConfig,
    ) -> Self {
        Self {
            orders,
            entitlements,
            payu,
        }
    }

    pub async fn handle(
        &self,
        cmd: VerifyPaymentCommand,
    ) -> Result<VerifyPaymentResult, PaymentError> {
        let request = validate_callback(&cmd.fields).map_err(PaymentError::Validation)?;

        let order = self.orders.get(request.order_id).await?;
        if !order.is_owned_by(&cmd.principal.id) {
            tracing::warn!(
                order_id = %order.id,
                caller = %cmd.principal.id,
                "Verify rejected: caller does not own order"
            );
            return Err(PaymentError::Forbidden);
        }

        match &request.signature {
            Some(signed) => {
                self.check_signature(&order, signed, &request.provider_status)?;
            }
            None if order.rail.has_signed_callback() => {
                // The card gateway always signs its callbacks; an unsigned
                // verify on that rail is either a broken client or a forgery.
                return Err(PaymentError::validation(
                    "hash",
                    "signed callback fields are required for this provider",
                ));
            }
            None => {}
        }

        let Some(outcome) = SettlementOutcome::from_provider_status(&request.provider_status)
        else {
            // In-flight or unrecognized status: leave the order pending.
            tracing::debug!(
                order_id = %order.id,
                status = %request.provider_status,
                "Provider status not terminal; order left pending"
            );
            return Ok(VerifyPaymentResult {
                order,
                paid: false,
                pending: true,
            });
        };

        let transition = self.orders.transition(order.id, outcome).await?;
        if transition.did_transition() && outcome == SettlementOutcome::Paid {
            self.entitlements.handle(transition.order()).await?;
        }

        let order = transition.order().clone();
        let paid = order.status == OrderStatus::Paid;
        Ok(VerifyPaymentResult {
            order,
            paid,
            pending: false,
        })
    }

    fn check_signature(
        &self,
        order: &Order,
        signed: &SignedCallback,
        status: &str,
    ) -> Result<(), PaymentError> {
        if !self.payu.is_configured() {
            return Err(PaymentError::not_configured(Rail::Payu));
        }

        let fields = HashFields {
            key: &self.payu.merchant_key,
            txnid: &signed.txnid,
            amount: &signed.amount,
            productinfo: &signed.productinfo,
            firstname: &signed.firstname,
            email: &signed.email,
        };

        if !verify_response_hash(
            &fields,
            status,
            self.payu.merchant_salt.expose_secret(),
            &signed.hash,
        ) {
            tracing::warn!(
                order_id = %order.id,
                txnid = %signed.txnid,
                "Callback hash mismatch; order left untouched"
            );
            return Err(PaymentError::SignatureMismatch);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryEntitlementStore, InMemoryOrderStore};
    use crate::domain::foundation::{TxnId, UserId};
    use crate::domain::payment::signing::response_hash;
    use crate::domain::payment::{BillingCycle, OrderStatus, Plan};
    use secrecy::SecretString;

    fn principal(id: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(id).unwrap(), None)
    }

    fn payu_config() -> PayuConfig {
        PayuConfig {
            merchant_key: "testkey".to_string(),
            merchant_salt: SecretString::new("testsalt".to_string()),
            ..Default::default()
        }
    }

    struct Fixture {
        orders: Arc<InMemoryOrderStore>,
        entitlements: Arc<InMemoryEntitlementStore>,
        handler: VerifyPaymentHandler,
    }

    fn fixture() -> Fixture {
        let orders = Arc::new(InMemoryOrderStore::new());
        let entitlements = Arc::new(InMemoryEntitlementStore::new());
        let handler = VerifyPaymentHandler::new(
            orders.clone(),
            GrantEntitlementHandler::new(entitlements.clone()),
            payu_config(),
        );
        Fixture {
            orders,
            entitlements,
            handler,
        }
    }

    async fn upi_order(fixture: &Fixture, owner: &str) -> Order {
        let order = fixture
            .orders
            .create(
                UserId::new(owner).unwrap(),
                Plan::Starter,
                99_900,
                BillingCycle::Monthly,
                Rail::Upi,
            )
            .await
            .unwrap();
        fixture
            .orders
            .set_provider_ref(order.id, TxnId::new("TXN1").unwrap())
            .await
            .unwrap();
        fixture.orders.get(order.id).await.unwrap()
    }

    fn unsigned_success(order: &Order) -> CallbackFields {
        CallbackFields {
            order_id: Some(order.id.to_string()),
            status: Some("success".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn success_on_unsigned_rail_settles_and_grants_plan() {
        let fixture = fixture();
        let order = upi_order(&fixture, "user-1").await;

        let result = fixture
            .handler
            .handle(VerifyPaymentCommand {
                principal: principal("user-1"),
                fields: unsigned_success(&order),
            })
            .await
            .unwrap();

        assert!(result.paid);
        assert!(!result.pending);
        assert_eq!(result.order.status, OrderStatus::Paid);
        assert_eq!(
            fixture.entitlements.plan_of(&order.user_id),
            Some(Plan::Starter)
        );
        assert_eq!(fixture.entitlements.audit_count(&order.user_id), 1);
        assert_eq!(fixture.entitlements.notification_count(&order.user_id), 1);
    }

    #[tokio::test]
    async fn duplicate_delivery_grants_entitlement_once() {
        let fixture = fixture();
        let order = upi_order(&fixture, "user-1").await;

        for _ in 0..3 {
            let result = fixture
                .handler
                .handle(VerifyPaymentCommand {
                    principal: principal("user-1"),
                    fields: unsigned_success(&order),
                })
                .await
                .unwrap();
            assert!(result.paid);
        }

        assert_eq!(fixture.entitlements.audit_count(&order.user_id), 1);
        assert_eq!(fixture.entitlements.notification_count(&order.user_id), 1);
    }

    #[tokio::test]
    async fn other_users_order_is_forbidden_and_unmodified() {
        let fixture = fixture();
        let order = upi_order(&fixture, "user-a").await;

        let result = fixture
            .handler
            .handle(VerifyPaymentCommand {
                principal: principal("user-b"),
                fields: unsigned_success(&order),
            })
            .await;

        assert!(matches!(result, Err(PaymentError::Forbidden)));
        let stored = fixture.orders.get(order.id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn pending_provider_status_mutates_nothing() {
        let fixture = fixture();
        let order = upi_order(&fixture, "user-1").await;

        let result = fixture
            .handler
            .handle(VerifyPaymentCommand {
                principal: principal("user-1"),
                fields: CallbackFields {
                    status: Some("pending".to_string()),
                    ..unsigned_success(&order)
                },
            })
            .await
            .unwrap();

        assert!(result.pending);
        assert!(!result.paid);
        let stored = fixture.orders.get(order.id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
        assert_eq!(fixture.entitlements.audit_count(&order.user_id), 0);
    }

    #[tokio::test]
    async fn failure_status_settles_failed_without_entitlement() {
        let fixture = fixture();
        let order = upi_order(&fixture, "user-1").await;

        let result = fixture
            .handler
            .handle(VerifyPaymentCommand {
                principal: principal("user-1"),
                fields: CallbackFields {
                    status: Some("failure".to_string()),
                    ..unsigned_success(&order)
                },
            })
            .await
            .unwrap();

        assert!(!result.paid);
        assert_eq!(result.order.status, OrderStatus::Failed);
        assert!(fixture.entitlements.plan_of(&order.user_id).is_none());
    }

    async fn payu_order(fixture: &Fixture, owner: &str) -> Order {
        let order = fixture
            .orders
            .create(
                UserId::new(owner).unwrap(),
                Plan::Business,
                10_000,
                BillingCycle::Monthly,
                Rail::Payu,
            )
            .await
            .unwrap();
        fixture
            .orders
            .set_provider_ref(order.id, TxnId::new("TXN1").unwrap())
            .await
            .unwrap();
        fixture.orders.get(order.id).await.unwrap()
    }

    fn signed_callback(order: &Order, status: &str, hash: String) -> CallbackFields {
        CallbackFields {
            order_id: Some(order.id.to_string()),
            status: Some(status.to_string()),
            txnid: Some("TXN1".to_string()),
            amount: Some("100.00".to_string()),
            productinfo: Some("Business Plan".to_string()),
            firstname: Some("Jane".to_string()),
            email: Some("jane@example.com".to_string()),
            hash: Some(hash),
            mihpayid: Some("403993715531047445".to_string()),
        }
    }

    fn genuine_hash(status: &str) -> String {
        response_hash(
            &HashFields {
                key: "testkey",
                txnid: "TXN1",
                amount: "100.00",
                productinfo: "Business Plan",
                firstname: "Jane",
                email: "jane@example.com",
            },
            status,
            "testsalt",
        )
    }

    #[tokio::test]
    async fn valid_signed_callback_settles_card_order() {
        let fixture = fixture();
        let order = payu_order(&fixture, "user-1").await;

        let result = fixture
            .handler
            .handle(VerifyPaymentCommand {
                principal: principal("user-1"),
                fields: signed_callback(&order, "success", genuine_hash("success")),
            })
            .await
            .unwrap();

        assert!(result.paid);
        assert_eq!(result.order.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn tampered_hash_is_a_signature_mismatch_without_mutation() {
        let fixture = fixture();
        let order = payu_order(&fixture, "user-1").await;

        let mut bad_hash = genuine_hash("success");
        bad_hash.replace_range(0..1, if &bad_hash[0..1] == "a" { "b" } else { "a" });

        let result = fixture
            .handler
            .handle(VerifyPaymentCommand {
                principal: principal("user-1"),
                fields: signed_callback(&order, "success", bad_hash),
            })
            .await;

        assert!(matches!(result, Err(PaymentError::SignatureMismatch)));
        let stored = fixture.orders.get(order.id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
        assert_eq!(fixture.entitlements.audit_count(&order.user_id), 0);
    }

    #[tokio::test]
    async fn unsigned_callback_on_card_rail_is_rejected() {
        let fixture = fixture();
        let order = payu_order(&fixture, "user-1").await;

        let result = fixture
            .handler
            .handle(VerifyPaymentCommand {
                principal: principal("user-1"),
                fields: unsigned_success(&order),
            })
            .await;

        assert!(matches!(result, Err(PaymentError::Validation(_))));
        let stored = fixture.orders.get(order.id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let fixture = fixture();

        let result = fixture
            .handler
            .handle(VerifyPaymentCommand {
                principal: principal("user-1"),
                fields: CallbackFields {
                    order_id: Some(crate::domain::foundation::OrderId::new().to_string()),
                    status: Some("success".to_string()),
                    ..Default::default()
                },
            })
            .await;

        assert!(matches!(result, Err(PaymentError::OrderNotFound(_))));
    }
}
