//! Product display metadata and the catalog seam.

use crate::error::LookupError;
use crate::ids::ProductId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Display metadata for a product, as served by `GET /products/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Unit price in major units, exactly as the catalog reports it.
    pub price: f64,
    /// Image URL.
    pub image: String,
}

impl Product {
    /// Create a product record.
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: f64,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
        }
    }
}

/// Source of truth for product display metadata.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ProductCatalog: Send + Sync {
    /// Look up a single product. `Ok(None)` if the catalog doesn't know it.
    async fn product(&self, product_id: ProductId) -> Result<Option<Product>, LookupError>;

    /// List every product in the catalog.
    async fn products(&self) -> Result<Vec<Product>, LookupError>;
}
