use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Stock movement recorded per order line, mirroring the shop's inventory log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryAdjustment {
    pub product_id: ProductId,
    pub quantity_out: u32,
    pub reason: String,
}

impl Order {
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self.status, next),
            (OrderStatus::Pending, OrderStatus::Paid)
                | (OrderStatus::Paid, OrderStatus::Shipped)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Paid, OrderStatus::Cancelled)
                | (OrderStatus::Shipped, OrderStatus::Cancelled)
        )
    }

    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), DomainError> {
        if self.can_transition_to(next) {
            self.status = next;
            return Ok(());
        }

        Err(DomainError::InvalidOrderTransition { from: self.status, to: next })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::domain::product::ProductId;

    use super::{Order, OrderId, OrderLine, OrderStatus};

    fn order(status: OrderStatus) -> Order {
        Order {
            id: OrderId("ord-1".to_string()),
            status,
            lines: vec![OrderLine {
                product_id: ProductId("bpc-157".to_string()),
                quantity: 1,
                unit_price: Decimal::new(6499, 2),
            }],
            subtotal: Decimal::new(6499, 2),
            tax: Decimal::new(520, 2),
            shipping: Decimal::new(999, 2),
            total: Decimal::new(8018, 2),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn allows_valid_lifecycle_transition() {
        let mut order = order(OrderStatus::Pending);
        order.transition_to(OrderStatus::Paid).expect("pending -> paid");
        assert_eq!(order.status, OrderStatus::Paid);
    }

    #[test]
    fn blocks_invalid_lifecycle_transition() {
        let mut order = order(OrderStatus::Pending);
        let error =
            order.transition_to(OrderStatus::Delivered).expect_err("pending -> delivered fails");
        assert!(matches!(error, crate::errors::DomainError::InvalidOrderTransition { .. }));
    }

    #[test]
    fn delivered_orders_cannot_be_cancelled() {
        let mut order = order(OrderStatus::Delivered);
        assert!(order.transition_to(OrderStatus::Cancelled).is_err());
    }
}
