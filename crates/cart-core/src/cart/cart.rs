//! Cart and line item types.

use std::collections::{HashMap, HashSet};

use crate::cart::{CartPricing, LineItemPricing};
use crate::catalog::Product;
use crate::error::PricingError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A shopping cart: line items in insertion order, unique by product.
///
/// Serializes as a bare JSON array of line items, which is also the
/// persisted format.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from items, enforcing the cart invariants.
    ///
    /// Zero-quantity items and repeated product ids are dropped (the first
    /// occurrence wins). Returns the cart and how many items were dropped.
    pub fn from_items(items: Vec<LineItem>) -> (Self, usize) {
        let total = items.len();
        let mut seen = HashSet::new();
        let items: Vec<LineItem> = items
            .into_iter()
            .filter(|item| item.quantity > 0 && seen.insert(item.product_id))
            .collect();
        let dropped = total - items.len();
        (Self { items }, dropped)
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Get the line item for a product.
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Check whether a product is in the cart.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Quantity in cart per product.
    pub fn quantities(&self) -> HashMap<ProductId, u32> {
        self.items
            .iter()
            .map(|i| (i.product_id, i.quantity))
            .collect()
    }

    /// Append a new line item.
    ///
    /// Returns `false` (and leaves the cart alone) if the product is already
    /// present or the quantity is zero.
    pub fn insert(&mut self, item: LineItem) -> bool {
        if item.quantity == 0 || self.contains(item.product_id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Increase a product's quantity by one.
    pub fn increment(&mut self, product_id: ProductId) -> bool {
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => match item.quantity.checked_add(1) {
                Some(quantity) => {
                    item.quantity = quantity;
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Set a product's quantity.
    ///
    /// A quantity of zero removes the item. Returns `false` if the product
    /// is not in the cart.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id);
        }
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a product, preserving the order of the remaining items.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() < len_before
    }

    /// Calculate cart pricing in `currency`.
    ///
    /// Unit prices are rounded to the currency's minor unit; the stored
    /// prices are not touched. Returns error on overflow or on a price that
    /// has no minor-unit representation.
    pub fn calculate_pricing(&self, currency: Currency) -> Result<CartPricing, PricingError> {
        let line_items = self
            .items
            .iter()
            .map(|item| {
                Ok(LineItemPricing {
                    product_id: item.product_id,
                    unit_price: item.unit_price_in(currency)?,
                    quantity: item.quantity,
                    subtotal: item.subtotal(currency)?,
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        let total = Money::try_sum(line_items.iter().map(|l| &l.subtotal), currency)
            .ok_or(PricingError::Overflow)?;

        Ok(CartPricing {
            line_items,
            total,
            item_count: self.item_count(),
        })
    }
}

/// One product entry in the cart with its chosen quantity.
///
/// Field names on the wire follow the storefront API: `id`, `title`,
/// `price`, `image`, `amount`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product ID.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Product name (denormalized for display).
    pub title: String,
    /// Unit price in major units, as the catalog reported it.
    #[serde(rename = "price")]
    pub unit_price: f64,
    /// Product image (denormalized for display).
    #[serde(rename = "image")]
    pub image_url: String,
    /// Quantity, always at least 1 while in a cart.
    #[serde(rename = "amount")]
    pub quantity: u32,
}

impl LineItem {
    /// Create a new line item.
    pub fn new(
        product_id: ProductId,
        title: impl Into<String>,
        unit_price: f64,
        image_url: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            product_id,
            title: title.into(),
            unit_price,
            image_url: image_url.into(),
            quantity,
        }
    }

    /// A single unit of a catalog product.
    pub fn from_product(product: &Product) -> Self {
        Self::new(
            product.id,
            product.title.clone(),
            product.price,
            product.image.clone(),
            1,
        )
    }

    /// Unit price in `currency`.
    pub fn unit_price_in(&self, currency: Currency) -> Result<Money, PricingError> {
        Money::from_decimal(self.unit_price, currency)
            .ok_or(PricingError::InvalidPrice(self.product_id))
    }

    /// Unit price times quantity, in `currency`.
    pub fn subtotal(&self, currency: Currency) -> Result<Money, PricingError> {
        self.unit_price_in(currency)?
            .try_multiply(i64::from(self.quantity))
            .ok_or(PricingError::Overflow)
    }
}
