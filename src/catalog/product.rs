//! Product record types.

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A product price.
///
/// Kept as the JSON number the client sent so integer prices are echoed back
/// as integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Number);

impl Price {
    /// Wrap a JSON number. Returns `None` for zero, which is treated as missing.
    pub fn new(value: Number) -> Option<Self> {
        match value.as_f64() {
            Some(v) if v != 0.0 => Some(Self(value)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        self.0.as_f64().unwrap_or_default()
    }
}

impl From<u32> for Price {
    fn from(value: u32) -> Self {
        Self(Number::from(value))
    }
}

/// A single record in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub in_stock: bool,
}

/// Validated fields for a product that does not have an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    pub in_stock: bool,
}

impl NewProduct {
    /// Attach an id, producing the stored record.
    pub fn with_id(self, id: impl Into<String>) -> Product {
        Product {
            id: id.into(),
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            in_stock: self.in_stock,
        }
    }
}

/// Partial update. Absent fields leave the stored value untouched.
///
/// Carries no `id`: a record's id never changes after creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow-merge this patch onto `product`.
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(in_stock) = self.in_stock {
            product.in_stock = in_stock;
        }
    }
}

/// The three records the service starts with.
pub fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".into(),
            name: "Laptop".into(),
            description: "16GB RAM".into(),
            price: Price::from(1200),
            category: "electronics".into(),
            in_stock: true,
        },
        Product {
            id: "2".into(),
            name: "Smartphone".into(),
            description: "128GB storage".into(),
            price: Price::from(800),
            category: "electronics".into(),
            in_stock: true,
        },
        Product {
            id: "3".into(),
            name: "Coffee Maker".into(),
            description: "Timer".into(),
            price: Price::from(50),
            category: "kitchen".into(),
            in_stock: false,
        },
    ]
}
