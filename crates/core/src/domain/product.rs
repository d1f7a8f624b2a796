use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub String);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub use_case: String,
    pub injection_site: String,
    pub description: String,
    pub tags: Vec<String>,
    pub price: Decimal,
    pub dosage: String,
    pub cycle_length: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default = "default_stock_quantity")]
    pub stock_quantity: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_stock_quantity() -> u32 {
    100
}

fn default_active() -> bool {
    true
}

impl Product {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }
}
