use crate::domain::product::{Product, ProductId};
use crate::errors::DomainError;

/// In-memory product catalog, preserving load order. The wizard reads the
/// active view once at start; checkout and admin edits mutate stock and
/// listings through the methods here.
#[derive(Clone, Debug, Default)]
pub struct CatalogStore {
    products: Vec<Product>,
}

impl CatalogStore {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// The storefront view: active products in load order.
    pub fn active_products(&self) -> Vec<Product> {
        self.products.iter().filter(|product| product.active).cloned().collect()
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    /// Create or replace a listing. Replacement keeps the product's catalog
    /// position so recommendation tie-breaking stays stable across edits.
    pub fn upsert(&mut self, product: Product) {
        match self.products.iter_mut().find(|existing| existing.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
    }

    pub fn deactivate(&mut self, product_id: &ProductId) -> Result<(), DomainError> {
        match self.products.iter_mut().find(|product| &product.id == product_id) {
            Some(product) => {
                product.active = false;
                Ok(())
            }
            None => Err(DomainError::UnknownProduct(product_id.0.clone())),
        }
    }

    pub fn available_stock(&self, product_id: &ProductId) -> Result<u32, DomainError> {
        self.find(product_id)
            .map(|product| product.stock_quantity)
            .ok_or_else(|| DomainError::UnknownProduct(product_id.0.clone()))
    }

    /// Remove `quantity` units from stock, refusing to go below zero.
    pub fn decrement_stock(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), DomainError> {
        let product = self
            .products
            .iter_mut()
            .find(|product| &product.id == product_id)
            .ok_or_else(|| DomainError::UnknownProduct(product_id.0.clone()))?;

        if product.stock_quantity < quantity {
            return Err(DomainError::InsufficientStock {
                product_id: product_id.0.clone(),
                requested: quantity,
                available: product.stock_quantity,
            });
        }

        product.stock_quantity -= quantity;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::product::{Product, ProductId};
    use crate::errors::DomainError;

    use super::CatalogStore;

    fn product(id: &str, stock: u32, active: bool) -> Product {
        Product {
            id: ProductId(id.to_string()),
            name: id.to_uppercase(),
            use_case: "test".to_string(),
            injection_site: "subcutaneous".to_string(),
            description: String::new(),
            tags: vec!["healing".to_string()],
            price: Decimal::new(5999, 2),
            dosage: "250mcg".to_string(),
            cycle_length: "6 weeks".to_string(),
            image: None,
            stock_quantity: stock,
            active,
        }
    }

    #[test]
    fn active_view_filters_inactive_listings_in_load_order() {
        let store = CatalogStore::new(vec![
            product("bpc-157", 10, true),
            product("mk-677", 5, false),
            product("tb-500", 3, true),
        ]);

        let ids: Vec<String> =
            store.active_products().into_iter().map(|product| product.id.0).collect();
        assert_eq!(ids, ["bpc-157", "tb-500"]);
    }

    #[test]
    fn upsert_replaces_in_place_and_appends_new_listings() {
        let mut store = CatalogStore::new(vec![product("a", 1, true), product("b", 1, true)]);

        let mut replacement = product("a", 42, true);
        replacement.name = "Updated".to_string();
        store.upsert(replacement);
        store.upsert(product("c", 7, true));

        assert_eq!(store.all()[0].name, "Updated");
        assert_eq!(store.all()[0].stock_quantity, 42);
        assert_eq!(store.len(), 3);
        assert_eq!(store.all()[2].id.0, "c");
    }

    #[test]
    fn stock_decrement_refuses_underflow() {
        let mut store = CatalogStore::new(vec![product("a", 2, true)]);

        store.decrement_stock(&ProductId("a".to_string()), 2).expect("drain stock");
        let error = store
            .decrement_stock(&ProductId("a".to_string()), 1)
            .expect_err("underflow must refuse");

        assert!(matches!(error, DomainError::InsufficientStock { available: 0, .. }));
    }

    #[test]
    fn unknown_products_are_reported() {
        let mut store = CatalogStore::default();
        assert!(matches!(
            store.decrement_stock(&ProductId("ghost".to_string()), 1),
            Err(DomainError::UnknownProduct(_))
        ));
        assert!(store.deactivate(&ProductId("ghost".to_string())).is_err());
    }
}
