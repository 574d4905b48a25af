//! Storefront JSON API bindings for the cart's collaborators.

use async_trait::async_trait;
use cart_core::{LookupError, Product, ProductCatalog, ProductId, StockLevel, StockOracle};
use serde::de::DeserializeOwned;

use crate::FetchClient;

/// Client for the storefront API.
///
/// - `GET /stock/{id}` → `{ "id": 1, "amount": 3 }`
/// - `GET /products/{id}` → `{ "id": 1, "title": "...", "price": 179.9, "image": "..." }`
/// - `GET /products` → array of products
///
/// A 404 means "no such record" and maps to `Ok(None)`.
#[derive(Clone)]
pub struct StorefrontApi {
    client: FetchClient,
}

impl StorefrontApi {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(FetchClient::new().with_base_url(base_url))
    }

    /// Use a preconfigured fetch client (base URL, headers, timeout).
    pub fn with_client(client: FetchClient) -> Self {
        Self { client }
    }

    /// The underlying fetch client.
    pub fn client(&self) -> &FetchClient {
        &self.client
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, LookupError> {
        let response = self
            .client
            .get(path)
            .accept("application/json")
            .send()
            .await?;

        if response.is_not_found() {
            tracing::debug!(path, "storefront API has no such record");
            return Ok(None);
        }

        let value = response.error_for_status()?.json()?;
        Ok(Some(value))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl StockOracle for StorefrontApi {
    async fn stock(&self, product_id: ProductId) -> Result<Option<StockLevel>, LookupError> {
        self.fetch(&format!("/stock/{}", product_id)).await
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ProductCatalog for StorefrontApi {
    async fn product(&self, product_id: ProductId) -> Result<Option<Product>, LookupError> {
        self.fetch(&format!("/products/{}", product_id)).await
    }

    async fn products(&self) -> Result<Vec<Product>, LookupError> {
        Ok(self.fetch("/products").await?.unwrap_or_default())
    }
}
