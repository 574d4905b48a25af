//! Stock levels and the stock oracle seam.

use crate::error::LookupError;
use crate::ids::ProductId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Available stock for a product, as reported by the storefront API.
///
/// Read-only and externally sourced; the cart never owns or changes it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockLevel {
    /// Product this level refers to.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Units available for purchase.
    #[serde(rename = "amount")]
    pub available_quantity: i64,
}

impl StockLevel {
    /// Create a stock level.
    pub fn new(product_id: ProductId, available_quantity: i64) -> Self {
        Self {
            product_id,
            available_quantity,
        }
    }

    /// Check if out of stock.
    pub fn is_out_of_stock(&self) -> bool {
        self.available_quantity <= 0
    }

    /// Check if a specific quantity is available.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        quantity <= self.available_quantity
    }
}

/// Source of truth for how many units of a product are available.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait StockOracle: Send + Sync {
    /// Look up stock for `product_id`.
    ///
    /// `Ok(None)` means the oracle has no stock record for the product.
    async fn stock(&self, product_id: ProductId) -> Result<Option<StockLevel>, LookupError>;
}
