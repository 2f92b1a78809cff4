//! In-memory catalog.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use rocket_shoes_core::{CatalogProduct, ProductId, StockInfo};

use super::{CatalogError, CatalogService};

/// Catalog held entirely in memory.
///
/// Clones share state, so a caller can keep a handle to adjust stock or take
/// the catalog offline after handing a clone to a store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    inner: Arc<Mutex<MemoryCatalogInner>>,
}

#[derive(Debug, Default)]
struct MemoryCatalogInner {
    products: HashMap<ProductId, CatalogProduct>,
    stock: HashMap<ProductId, u32>,
    offline: bool,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product with the given stock level, replacing any previous entry.
    #[must_use]
    pub fn with_product(self, product: CatalogProduct, stock: u32) -> Self {
        self.insert(product, stock);
        self
    }

    /// Add or replace a product and its stock level.
    pub fn insert(&self, product: CatalogProduct, stock: u32) {
        let mut inner = self.lock();
        inner.stock.insert(product.id, stock);
        inner.products.insert(product.id, product);
    }

    /// Set the stock level for a product.
    pub fn set_stock(&self, id: ProductId, amount: u32) {
        self.lock().stock.insert(id, amount);
    }

    /// Make every lookup fail with `CatalogError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryCatalogInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CatalogService for MemoryCatalog {
    async fn product(&self, id: ProductId) -> Result<CatalogProduct, CatalogError> {
        let inner = self.lock();
        if inner.offline {
            return Err(CatalogError::Unavailable("catalog is offline".to_string()));
        }
        inner
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("products/{id}")))
    }

    async fn stock(&self, id: ProductId) -> Result<StockInfo, CatalogError> {
        let inner = self.lock();
        if inner.offline {
            return Err(CatalogError::Unavailable("catalog is offline".to_string()));
        }
        inner
            .stock
            .get(&id)
            .map(|&amount| StockInfo { id, amount })
            .ok_or_else(|| CatalogError::NotFound(format!("stock/{id}")))
    }
}
