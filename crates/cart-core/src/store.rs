//! The cart store: stock-validated mutations with persistence.

use std::collections::HashMap;
use std::sync::Arc;

use cart_storage::{Cache, StorageBackend};

use crate::cart::{Cart, CartPricing, LineItem};
use crate::catalog::{ProductCatalog, StockOracle};
use crate::config::CartConfig;
use crate::error::{describe_storage, CartError, PricingError};
use crate::ids::ProductId;
use crate::notify::{LogNotifier, Notifier};

/// Owns the cart and keeps its persisted copy in sync.
///
/// Every mutation follows the same order: query collaborators, validate,
/// apply the change to a copy of the cart, persist the copy, and only then
/// make it the current cart. A failure at any step leaves both the
/// in-memory and the persisted cart untouched, reports a [`Notice`] to the
/// notifier, and returns the error.
///
/// Operations take `&mut self`, so at most one is in flight per store.
///
/// [`Notice`]: crate::Notice
pub struct CartStore<B> {
    cart: Cart,
    cache: Cache<B>,
    config: CartConfig,
    stock: Arc<dyn StockOracle>,
    catalog: Arc<dyn ProductCatalog>,
    notifier: Arc<dyn Notifier>,
}

impl<B: StorageBackend> CartStore<B> {
    /// Open a store, restoring whatever cart was persisted under
    /// `config.storage_key`.
    ///
    /// Storage is best-effort: an unreadable or malformed entry yields an
    /// empty cart rather than an error.
    pub fn open(
        config: CartConfig,
        backend: B,
        stock: Arc<dyn StockOracle>,
        catalog: Arc<dyn ProductCatalog>,
    ) -> Self {
        let cache = Cache::new(backend);
        let cart = load_cart(&cache, &config);
        Self {
            cart,
            cache,
            config,
            stock,
            catalog,
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Route failure notices to `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Add one unit of a product.
    ///
    /// New products are looked up in the catalog and appended with quantity
    /// 1; products already in the cart are incremented, provided stock
    /// allows it.
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.try_add(product_id).await;
        self.report(result)
    }

    /// Remove a product from the cart.
    pub fn remove_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.try_remove(product_id);
        self.report(result)
    }

    /// Set a product's quantity.
    ///
    /// Quantities of zero or less are ignored, as are products that are not
    /// in the cart; neither is an error.
    pub async fn update_product_amount(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<(), CartError> {
        let result = self.try_update(product_id, quantity).await;
        self.report(result)
    }

    async fn try_add(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let level = self
            .stock
            .stock(product_id)
            .await
            .map_err(|e| CartError::add_failed(product_id, e))?;

        let in_cart = self.cart.get(product_id).map(|item| i64::from(item.quantity));
        let requested = in_cart.unwrap_or(0) + 1;

        let available = match level {
            Some(level) if !level.is_out_of_stock() && level.can_fulfill(requested) => {
                level.available_quantity
            }
            other => {
                return Err(CartError::OutOfStock {
                    product_id,
                    requested,
                    available: other.map(|l| l.available_quantity).unwrap_or(0),
                })
            }
        };

        let item = match in_cart {
            Some(_) => None,
            None => {
                let product = self
                    .catalog
                    .product(product_id)
                    .await
                    .map_err(|e| CartError::add_failed(product_id, e))?
                    .ok_or_else(|| CartError::add_failed(product_id, "product not in catalog"))?;
                if product.id != product_id {
                    tracing::debug!(%product_id, returned = %product.id, "catalog returned a different id");
                }
                if !(product.price.is_finite() && product.price >= 0.0) {
                    tracing::warn!(%product_id, price = product.price, "catalog returned an unusual price");
                }
                let mut item = LineItem::from_product(&product);
                item.product_id = product_id;
                Some(item)
            }
        };

        // Start from the latest state, after every await.
        let mut next = self.cart.clone();
        let changed = match item {
            Some(item) => next.insert(item),
            None => next.increment(product_id),
        };
        if !changed {
            return Err(CartError::add_failed(product_id, "cart rejected the change"));
        }

        self.commit(next)
            .map_err(|reason| CartError::add_failed(product_id, reason))?;
        tracing::debug!(%product_id, requested, available, "added product to cart");
        Ok(())
    }

    fn try_remove(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let mut next = self.cart.clone();
        if !next.remove(product_id) {
            return Err(CartError::remove_failed(product_id, "product not in cart"));
        }

        self.commit(next)
            .map_err(|reason| CartError::remove_failed(product_id, reason))?;
        tracing::debug!(%product_id, "removed product from cart");
        Ok(())
    }

    async fn try_update(&mut self, product_id: ProductId, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            tracing::debug!(%product_id, quantity, "ignoring non-positive quantity");
            return Ok(());
        }
        if !self.cart.contains(product_id) {
            tracing::debug!(%product_id, "ignoring update for product not in cart");
            return Ok(());
        }

        let level = self
            .stock
            .stock(product_id)
            .await
            .map_err(|e| CartError::update_failed(product_id, e))?
            .ok_or_else(|| CartError::update_failed(product_id, "no stock record"))?;

        if !level.can_fulfill(quantity) {
            return Err(CartError::OutOfStock {
                product_id,
                requested: quantity,
                available: level.available_quantity,
            });
        }
        let quantity = u32::try_from(quantity)
            .map_err(|_| CartError::update_failed(product_id, "quantity too large"))?;

        let mut next = self.cart.clone();
        if !next.set_quantity(product_id, quantity) {
            return Ok(());
        }

        self.commit(next)
            .map_err(|reason| CartError::update_failed(product_id, reason))?;
        tracing::debug!(%product_id, quantity, "updated product quantity");
        Ok(())
    }

    /// Persist `next`, then make it the current cart.
    fn commit(&mut self, next: Cart) -> Result<(), String> {
        self.cache
            .set(&self.config.storage_key, &next)
            .map_err(|e| describe_storage(&e))?;
        self.cart = next;
        Ok(())
    }

    fn report(&self, result: Result<(), CartError>) -> Result<(), CartError> {
        if let Err(err) = &result {
            tracing::warn!(error = %err, "cart operation failed");
            self.notifier.notify(&err.notice());
        }
        result
    }

    /// Current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Current items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Line item for a product.
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.cart.get(product_id)
    }

    /// Whether a product is in the cart.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.cart.contains(product_id)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.cart.len()
    }

    /// Whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Quantity in cart per product.
    pub fn quantities(&self) -> HashMap<ProductId, u32> {
        self.cart.quantities()
    }

    /// Subtotals and total in the configured currency.
    pub fn pricing(&self) -> Result<CartPricing, PricingError> {
        self.cart.calculate_pricing(self.config.currency)
    }

    /// Store configuration.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// The storage backend.
    pub fn backend(&self) -> &B {
        self.cache.backend()
    }
}

fn load_cart<B: StorageBackend>(cache: &Cache<B>, config: &CartConfig) -> Cart {
    let items = match cache.get::<Vec<LineItem>>(&config.storage_key) {
        Ok(Some(items)) => items,
        Ok(None) => return Cart::new(),
        Err(e) => {
            tracing::warn!(key = %config.storage_key, error = %e, "discarding unreadable cart");
            return Cart::new();
        }
    };

    let (cart, dropped) = Cart::from_items(items);
    if dropped > 0 {
        tracing::warn!(dropped, "dropped invalid line items from persisted cart");
    }
    tracing::debug!(items = cart.len(), "restored cart");
    cart
}
