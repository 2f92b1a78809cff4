//! REST catalog client.
//!
//! Uses `reqwest` for HTTP. Product records are cached with `moka` for the
//! configured TTL; stock levels always go to the network.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use rocket_shoes_core::{CatalogProduct, ProductId, StockInfo};

use super::{CatalogError, CatalogService};
use crate::config::CatalogConfig;

/// Client for the REST product catalog.
///
/// Cheap to clone; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct HttpCatalogClient {
    inner: Arc<HttpCatalogClientInner>,
}

struct HttpCatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<SecretString>,
    products: Option<Cache<ProductId, CatalogProduct>>,
}

impl std::fmt::Debug for HttpCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCatalogClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("api_token", &self.inner.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("cached", &self.inner.products.is_some())
            .finish()
    }
}

impl HttpCatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let products = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(HttpCatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                api_token: config.api_token.clone(),
                products,
            }),
        })
    }

    /// GET a catalog path and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self.inner.base_url.join(path)?;

        let mut request = self.inner.client.get(url);
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                path,
                body = %body.chars().take(200).collect::<String>(),
                "Catalog returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(
                error = %e,
                path,
                body = %body.chars().take(200).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

#[async_trait]
impl CatalogService for HttpCatalogClient {
    #[instrument(skip_all, fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<CatalogProduct, CatalogError> {
        if let Some(cache) = &self.inner.products
            && let Some(product) = cache.get(&id).await
        {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: CatalogProduct = self.get_json(&format!("products/{id}")).await?;

        if let Some(cache) = &self.inner.products {
            cache.insert(id, product.clone()).await;
        }

        Ok(product)
    }

    #[instrument(skip_all, fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<StockInfo, CatalogError> {
        self.get_json(&format!("stock/{id}")).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use rocket_shoes_core::Price;

    use super::*;

    const PRODUCT_1: &str = r#"{
        "id": 1,
        "title": "Tênis de Caminhada Leve Confortável",
        "price": 179.9,
        "image": "ignored",
        "imageUrl": "https://example.com/tenis1.jpg"
    }"#;

    fn client_for(server: &mockito::ServerGuard, cache_ttl: Duration) -> HttpCatalogClient {
        let mut config = CatalogConfig::new(Url::parse(&format!("{}/", server.url())).unwrap());
        config.cache_ttl = cache_ttl;
        HttpCatalogClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_product_fetches_and_decodes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/products/1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PRODUCT_1)
            .create_async()
            .await;

        let client = client_for(&server, Duration::ZERO);
        let product = client.product(ProductId::new(1)).await.unwrap();

        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(17990));
        assert_eq!(product.image_url, "https://example.com/tenis1.jpg");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_product_is_cached() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/products/1")
            .with_status(200)
            .with_body(PRODUCT_1)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server, Duration::from_secs(60));
        client.product(ProductId::new(1)).await.unwrap();
        client.product(ProductId::new(1)).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_stock_is_never_cached() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/stock/1")
            .with_status(200)
            .with_body(r#"{"id": 1, "amount": 3}"#)
            .expect(2)
            .create_async()
            .await;

        let client = client_for(&server, Duration::from_secs(60));
        let first = client.stock(ProductId::new(1)).await.unwrap();
        let second = client.stock(ProductId::new(1)).await.unwrap();

        assert_eq!(first.amount, 3);
        assert_eq!(first, second);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_not_found_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/products/99")
            .with_status(404)
            .with_body("{}")
            .create_async()
            .await;

        let client = client_for(&server, Duration::ZERO);
        let err = client.product(ProductId::new(99)).await.unwrap_err();

        assert!(matches!(err, CatalogError::NotFound(ref path) if path == "products/99"));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/stock/1")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = client_for(&server, Duration::ZERO);
        let err = client.stock(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(err, CatalogError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_bad_body_maps_to_parse() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/stock/1")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server, Duration::ZERO);
        let err = client.stock(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/stock/2")
            .match_header("authorization", "Bearer catalog-token")
            .with_status(200)
            .with_body(r#"{"id": 2, "amount": 5}"#)
            .create_async()
            .await;

        let mut config = CatalogConfig::new(Url::parse(&format!("{}/", server.url())).unwrap());
        config.api_token = Some(SecretString::from("catalog-token"));
        let client = HttpCatalogClient::new(&config).unwrap();

        let stock = client.stock(ProductId::new(2)).await.unwrap();
        assert_eq!(stock.amount, 5);
        mock.assert_async().await;
    }
}
