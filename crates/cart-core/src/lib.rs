//! Cart state management for the storefront.
//!
//! - **Cart**: ordered line items, unique by product, quantity always ≥ 1
//! - **Catalog**: product metadata and stock levels behind async traits
//! - **CartStore**: add / remove / update-amount, validated against stock
//!   and persisted through a [`cart_storage::StorageBackend`] after every
//!   successful change
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cart_core::prelude::*;
//! use cart_storage::MemoryStore;
//!
//! let api = Arc::new(my_storefront_api);
//! let mut store = CartStore::open(CartConfig::default(), MemoryStore::new(), api.clone(), api);
//!
//! store.add_product(ProductId::new(1)).await?;
//! store.update_product_amount(ProductId::new(1), 3).await?;
//! println!("Total: {}", store.pricing()?.total);
//! ```

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ids;
pub mod money;
pub mod notify;
pub mod store;

pub use cart::{Cart, CartPricing, LineItem, LineItemPricing};
pub use catalog::{Product, ProductCatalog, StockLevel, StockOracle};
pub use config::{CartConfig, DEFAULT_STORAGE_KEY};
pub use error::{CartError, ErrorKind, LookupError, Notice, PricingError};
pub use ids::ProductId;
pub use money::{Currency, Money};
pub use notify::{LogNotifier, Notifier};
pub use store::CartStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{Cart, CartPricing, LineItem, LineItemPricing};
    pub use crate::catalog::{Product, ProductCatalog, StockLevel, StockOracle};
    pub use crate::config::CartConfig;
    pub use crate::error::{CartError, ErrorKind, LookupError, Notice, PricingError};
    pub use crate::ids::ProductId;
    pub use crate::money::{Currency, Money};
    pub use crate::notify::{LogNotifier, Notifier};
    pub use crate::store::CartStore;
}
