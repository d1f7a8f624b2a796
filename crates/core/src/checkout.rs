//! Order creation against an opaque payment gateway.
//!
//! Checkout verifies stock, prices the cart, asks the gateway for a hosted
//! checkout session, then applies the stock movements. The gateway's wire
//! format is not modeled here; implementations live behind [`PaymentGateway`].

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cart::{CartItem, InMemoryCart};
use crate::catalog::CatalogStore;
use crate::domain::order::{InventoryAdjustment, Order, OrderId, OrderLine, OrderStatus};
use crate::errors::{ApplicationError, DomainError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutPolicy {
    pub currency: String,
    pub tax_rate: Decimal,
    pub shipping_flat: Decimal,
    pub free_shipping_threshold: Option<Decimal>,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            tax_rate: Decimal::new(8, 2),
            shipping_flat: Decimal::new(999, 2),
            free_shipping_threshold: Some(Decimal::new(10_000, 2)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

/// Price a cart: tax on the subtotal, flat shipping waived above the free
/// threshold, everything rounded to cents.
pub fn summarize(items: &[CartItem], policy: &CheckoutPolicy) -> OrderSummary {
    let subtotal: Decimal =
        items.iter().map(|item| item.product.price * Decimal::from(item.quantity)).sum();
    let tax = round_cents(subtotal * policy.tax_rate);
    let free_shipping =
        policy.free_shipping_threshold.map_or(false, |threshold| subtotal > threshold);
    let shipping = if free_shipping || items.is_empty() {
        Decimal::ZERO
    } else {
        policy.shipping_flat
    };

    OrderSummary { subtotal, tax, shipping, total: subtotal + tax + shipping }
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("payment gateway rejected the checkout: {0}")]
pub struct GatewayError(pub String);

/// Hosted checkout handle returned by the payment provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub session_id: String,
    pub redirect_url: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(&self, order: &Order)
        -> Result<CheckoutSession, GatewayError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct CheckoutOutcome {
    pub order: Order,
    pub session: CheckoutSession,
    pub adjustments: Vec<InventoryAdjustment>,
}

/// Turn the cart into a pending order.
///
/// Stock is verified up front for every line; any shortfall refuses the whole
/// order and leaves the catalog untouched. Stock movements are only applied
/// once the gateway has accepted the session.
pub async fn place_order(
    cart: &InMemoryCart,
    store: &mut CatalogStore,
    gateway: &dyn PaymentGateway,
    policy: &CheckoutPolicy,
) -> Result<CheckoutOutcome, ApplicationError> {
    let items = cart.items();
    if items.is_empty() {
        return Err(DomainError::EmptyCart.into());
    }

    for item in &items {
        let available = store.available_stock(&item.product.id)?;
        if available < item.quantity {
            return Err(DomainError::InsufficientStock {
                product_id: item.product.id.0.clone(),
                requested: item.quantity,
                available,
            }
            .into());
        }
    }

    let summary = summarize(&items, policy);
    let order = Order {
        id: OrderId(Uuid::new_v4().to_string()),
        status: OrderStatus::Pending,
        lines: items
            .iter()
            .map(|item| OrderLine {
                product_id: item.product.id.clone(),
                quantity: item.quantity,
                unit_price: item.product.price,
            })
            .collect(),
        subtotal: summary.subtotal,
        tax: summary.tax,
        shipping: summary.shipping,
        total: summary.total,
        created_at: Utc::now(),
    };

    let session = gateway
        .create_checkout_session(&order)
        .await
        .map_err(|error| ApplicationError::Integration(error.to_string()))?;

    let mut adjustments = Vec::with_capacity(items.len());
    for item in &items {
        store.decrement_stock(&item.product.id, item.quantity)?;
        adjustments.push(InventoryAdjustment {
            product_id: item.product.id.clone(),
            quantity_out: item.quantity,
            reason: format!("order {}", order.id.0),
        });
    }

    Ok(CheckoutOutcome { order, session, adjustments })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use crate::cart::{CartCollaborator, InMemoryCart};
    use crate::catalog::CatalogStore;
    use crate::domain::order::{Order, OrderStatus};
    use crate::domain::product::{Product, ProductId};
    use crate::errors::{ApplicationError, DomainError};

    use super::{
        place_order, summarize, CheckoutPolicy, CheckoutSession, GatewayError, PaymentGateway,
    };

    fn product(id: &str, price_cents: i64, stock: u32) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: id.to_uppercase(),
            use_case: "test".to_string(),
            injection_site: "subcutaneous".to_string(),
            description: String::new(),
            tags: Vec::new(),
            price: Decimal::new(price_cents, 2),
            dosage: "250mcg".to_string(),
            cycle_length: "6 weeks".to_string(),
            image: None,
            stock_quantity: stock,
            active: true,
        }
    }

    #[derive(Default)]
    struct RecordingGateway {
        calls: AtomicU32,
        reject: bool,
    }

    #[async_trait]
    impl PaymentGateway for RecordingGateway {
        async fn create_checkout_session(
            &self,
            order: &Order,
        ) -> Result<CheckoutSession, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject {
                return Err(GatewayError("card declined".to_string()));
            }
            Ok(CheckoutSession {
                session_id: format!("cs_{}", order.id.0),
                redirect_url: format!("https://pay.example.test/session/{}", order.id.0),
            })
        }
    }

    #[test]
    fn summary_applies_tax_and_flat_shipping_below_threshold() {
        let cart = InMemoryCart::default();
        cart.add_item(&product("a", 2500, 10));

        let summary = summarize(&cart.items(), &CheckoutPolicy::default());
        assert_eq!(summary.subtotal, Decimal::new(2500, 2));
        assert_eq!(summary.tax, Decimal::new(200, 2));
        assert_eq!(summary.shipping, Decimal::new(999, 2));
        assert_eq!(summary.total, Decimal::new(3699, 2));
    }

    #[test]
    fn shipping_is_waived_above_the_free_threshold() {
        let cart = InMemoryCart::default();
        cart.add_item(&product("a", 6000, 10));
        cart.add_item(&product("b", 6000, 10));

        let summary = summarize(&cart.items(), &CheckoutPolicy::default());
        assert_eq!(summary.shipping, Decimal::ZERO);
        assert_eq!(summary.total, Decimal::new(12_960, 2));
    }

    #[test]
    fn shipping_still_applies_exactly_at_the_threshold() {
        let cart = InMemoryCart::default();
        cart.add_item(&product("a", 10_000, 10));

        let summary = summarize(&cart.items(), &CheckoutPolicy::default());
        assert_eq!(summary.shipping, Decimal::new(999, 2));
    }

    #[tokio::test]
    async fn placing_an_order_decrements_stock_and_calls_the_gateway_once() {
        let cart = InMemoryCart::default();
        cart.add_item(&product("bpc-157", 6499, 5));
        cart.add_item(&product("bpc-157", 6499, 5));

        let mut store = CatalogStore::new(vec![product("bpc-157", 6499, 5)]);
        let gateway = RecordingGateway::default();

        let outcome =
            place_order(&cart, &mut store, &gateway, &CheckoutPolicy::default())
                .await
                .expect("order placed");

        assert_eq!(outcome.order.status, OrderStatus::Pending);
        assert_eq!(outcome.order.lines.len(), 1);
        assert_eq!(outcome.order.lines[0].quantity, 2);
        assert_eq!(outcome.adjustments.len(), 1);
        assert_eq!(outcome.adjustments[0].quantity_out, 2);
        assert!(outcome.adjustments[0].reason.contains(&outcome.order.id.0));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            store.available_stock(&ProductId("bpc-157".to_string())).expect("stock"),
            3
        );
    }

    #[tokio::test]
    async fn insufficient_stock_refuses_the_whole_order() {
        let cart = InMemoryCart::default();
        cart.add_item(&product("a", 1000, 1));
        cart.add_item(&product("b", 1000, 1));
        cart.update_quantity(&ProductId("b".to_string()), 3);

        let mut store =
            CatalogStore::new(vec![product("a", 1000, 10), product("b", 1000, 2)]);
        let gateway = RecordingGateway::default();

        let error = place_order(&cart, &mut store, &gateway, &CheckoutPolicy::default())
            .await
            .expect_err("shortfall must refuse");

        assert!(matches!(
            error,
            ApplicationError::Domain(DomainError::InsufficientStock { requested: 3, .. })
        ));
        // Nothing was decremented and the gateway never saw the order.
        assert_eq!(store.available_stock(&ProductId("a".to_string())).expect("stock"), 10);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_cart_is_refused() {
        let cart = InMemoryCart::default();
        let mut store = CatalogStore::default();
        let gateway = RecordingGateway::default();

        let error = place_order(&cart, &mut store, &gateway, &CheckoutPolicy::default())
            .await
            .expect_err("empty cart must refuse");
        assert!(matches!(error, ApplicationError::Domain(DomainError::EmptyCart)));
    }

    #[tokio::test]
    async fn gateway_rejection_surfaces_as_integration_failure_and_keeps_stock() {
        let cart = InMemoryCart::default();
        cart.add_item(&product("a", 1000, 5));

        let mut store = CatalogStore::new(vec![product("a", 1000, 5)]);
        let gateway = RecordingGateway { reject: true, ..RecordingGateway::default() };

        let error = place_order(&cart, &mut store, &gateway, &CheckoutPolicy::default())
            .await
            .expect_err("rejected session");

        assert!(matches!(error, ApplicationError::Integration(_)));
        assert_eq!(store.available_stock(&ProductId("a".to_string())).expect("stock"), 5);
    }
}
