//! Product catalog service: product and stock lookups.
//!
//! # Architecture
//!
//! - [`CatalogService`] is the seam the cart store talks through
//! - [`HttpCatalogClient`] calls the REST catalog (`products/{id}`, `stock/{id}`)
//! - [`MemoryCatalog`] serves products from memory, for embedding and tests
//!
//! The catalog is the source of truth for stock. Stock levels are fetched on
//! every check and never cached; product records may be cached by the HTTP
//! client since they only seed a new cart line.

mod http;
mod memory;

pub use http::HttpCatalogClient;
pub use memory::MemoryCatalog;

use async_trait::async_trait;
use thiserror::Error;

use rocket_shoes_core::{CatalogProduct, ProductId, StockInfo};

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog answered with a non-success status.
    #[error("Unexpected status {status} from {path}")]
    Status { status: u16, path: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Catalog cannot be reached at all.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Remote source of product records and stock levels.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch a product record by ID.
    async fn product(&self, id: ProductId) -> Result<CatalogProduct, CatalogError>;

    /// Fetch the current stock level for a product.
    async fn stock(&self, id: ProductId) -> Result<StockInfo, CatalogError>;
}

#[async_trait]
impl<T: CatalogService + ?Sized> CatalogService for std::sync::Arc<T> {
    async fn product(&self, id: ProductId) -> Result<CatalogProduct, CatalogError> {
        (**self).product(id).await
    }

    async fn stock(&self, id: ProductId) -> Result<StockInfo, CatalogError> {
        (**self).stock(id).await
    }
}
