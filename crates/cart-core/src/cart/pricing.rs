//! Cart pricing calculations.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Per-line-item pricing breakdown, in cart order.
    pub line_items: Vec<LineItemPricing>,
    /// Sum of line subtotals.
    pub total: Money,
    /// Sum of quantities.
    pub item_count: u64,
}

impl CartPricing {
    /// Pricing for a single product, if it is in the cart.
    pub fn line(&self, product_id: ProductId) -> Option<&LineItemPricing> {
        self.line_items.iter().find(|l| l.product_id == product_id)
    }
}

/// Pricing breakdown for a single line item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemPricing {
    /// Product ID.
    pub product_id: ProductId,
    /// Unit price.
    pub unit_price: Money,
    /// Quantity.
    pub quantity: u32,
    /// Subtotal (unit_price * quantity).
    pub subtotal: Money,
}
