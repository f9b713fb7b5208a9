//! In-memory product store.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::catalog::product::{seed_products, NewProduct, Product, ProductPatch};
use crate::observability::metrics;

/// Thread-safe owner of the product collection.
///
/// Every operation takes the lock once and releases it before returning, so
/// concurrent requests observe the same serial order a single-threaded server
/// would. Callers get clones, never references into the collection.
#[derive(Debug, Default)]
pub struct ProductStore {
    products: Mutex<Vec<Product>>,
}

impl ProductStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the seed records.
    pub fn seeded() -> Self {
        Self::from_products(seed_products())
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        metrics::record_product_count(products.len());
        Self {
            products: Mutex::new(products),
        }
    }

    // A panic while holding the lock cannot leave the Vec half-modified.
    fn lock(&self) -> MutexGuard<'_, Vec<Product>> {
        self.products.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All products, or only those in `category`, in insertion order.
    pub fn list(&self, category: Option<&str>) -> Vec<Product> {
        let products = self.lock();
        match category {
            Some(category) => products
                .iter()
                .filter(|p| p.category == category)
                .cloned()
                .collect(),
            None => products.clone(),
        }
    }

    /// Products whose name contains `term`, ignoring case.
    ///
    /// An absent or empty term matches everything.
    pub fn search(&self, term: Option<&str>) -> Vec<Product> {
        let needle = term.unwrap_or_default().to_lowercase();
        self.lock()
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Product count per category.
    pub fn stats(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for product in self.lock().iter() {
            *counts.entry(product.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn get(&self, id: &str) -> Option<Product> {
        self.lock().iter().find(|p| p.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().iter().any(|p| p.id == id)
    }

    /// Assign a fresh id and append.
    pub fn create(&self, fields: NewProduct) -> Product {
        let product = fields.with_id(Uuid::new_v4().to_string());

        let mut products = self.lock();
        products.push(product.clone());
        metrics::record_product_count(products.len());

        product
    }

    /// Merge `patch` onto the record with `id`. Returns `None` if absent.
    pub fn update(&self, id: &str, patch: ProductPatch) -> Option<Product> {
        let mut products = self.lock();
        let product = products.iter_mut().find(|p| p.id == id)?;
        patch.apply(product);

        Some(product.clone())
    }

    /// Remove the record with `id`. Returns `false` if absent.
    pub fn delete(&self, id: &str) -> bool {
        let mut products = self.lock();
        let Some(index) = products.iter().position(|p| p.id == id) else {
            return false;
        };
        products.remove(index);
        metrics::record_product_count(products.len());

        true
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Slice one page out of `items`.
///
/// `page` is 1-based and defaults to 1; `limit` defaults to `items.len()`.
/// Zero is treated as absent for both. Pages past the end are empty.
pub fn paginate(items: Vec<Product>, page: Option<usize>, limit: Option<usize>) -> Vec<Product> {
    let page = page.filter(|&p| p > 0).unwrap_or(1);
    let limit = limit.filter(|&l| l > 0).unwrap_or(items.len());
    let start = (page - 1).saturating_mul(limit);

    items.into_iter().skip(start).take(limit).collect()
}
