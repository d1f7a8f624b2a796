use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

/// External collaborator the wizard hands chosen products to, one call per
/// user-initiated add action.
pub trait CartCollaborator: Send + Sync {
    fn add_item(&self, product: &Product);
}

/// The storefront cart: adding an existing product merges into its line,
/// setting a quantity to zero removes the line.
#[derive(Clone, Default)]
pub struct InMemoryCart {
    items: Arc<Mutex<Vec<CartItem>>>,
}

impl InMemoryCart {
    pub fn items(&self) -> Vec<CartItem> {
        match self.items.lock() {
            Ok(items) => items.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.items().iter().map(|item| item.quantity).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        self.items()
            .iter()
            .map(|item| item.product.price * Decimal::from(item.quantity))
            .sum()
    }

    pub fn remove_item(&self, product_id: &ProductId) {
        self.with_items(|items| items.retain(|item| &item.product.id != product_id));
    }

    pub fn update_quantity(&self, product_id: &ProductId, quantity: u32) {
        self.with_items(|items| {
            if quantity == 0 {
                items.retain(|item| &item.product.id != product_id);
                return;
            }
            if let Some(item) = items.iter_mut().find(|item| &item.product.id == product_id) {
                item.quantity = quantity;
            }
        });
    }

    pub fn clear(&self) {
        self.with_items(Vec::clear);
    }

    fn with_items(&self, apply: impl FnOnce(&mut Vec<CartItem>)) {
        match self.items.lock() {
            Ok(mut items) => apply(&mut items),
            Err(poisoned) => apply(&mut poisoned.into_inner()),
        }
    }
}

impl CartCollaborator for InMemoryCart {
    fn add_item(&self, product: &Product) {
        self.with_items(|items| {
            match items.iter_mut().find(|item| item.product.id == product.id) {
                Some(item) => item.quantity += 1,
                None => items.push(CartItem { product: product.clone(), quantity: 1 }),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::product::{Product, ProductId};

    use super::{CartCollaborator, InMemoryCart};

    fn product(id: &str, price_cents: i64) -> Product {
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
            stock_quantity: 100,
            active: true,
        }
    }

    #[test]
    fn adding_an_existing_product_merges_into_one_line() {
        let cart = InMemoryCart::default();
        let bpc = product("bpc-157", 6499);

        cart.add_item(&bpc);
        cart.add_item(&bpc);

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn subtotal_sums_price_times_quantity() {
        let cart = InMemoryCart::default();
        cart.add_item(&product("a", 1000));
        cart.add_item(&product("b", 2550));
        cart.update_quantity(&ProductId("a".to_string()), 3);

        assert_eq!(cart.subtotal(), Decimal::new(5550, 2));
    }

    #[test]
    fn zero_quantity_removes_the_line() {
        let cart = InMemoryCart::default();
        cart.add_item(&product("a", 1000));
        cart.update_quantity(&ProductId("a".to_string()), 0);

        assert!(cart.is_empty());
    }

    #[test]
    fn remove_item_only_touches_the_matching_line() {
        let cart = InMemoryCart::default();
        cart.add_item(&product("a", 1000));
        cart.add_item(&product("b", 2000));
        cart.remove_item(&ProductId("a".to_string()));

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product.id.0, "b");
    }
}
