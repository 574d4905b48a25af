//! Render the cart.

use anyhow::{Context as _, Result};
use cart_core::{CartPricing, CartStore, Currency, LineItem, Money, ProductId};
use cart_storage::StorageBackend;
use serde::Serialize;

use crate::context::Context;

const WIDTHS: [usize; 5] = [6, 36, 12, 5, 12];

/// Run the show command.
pub async fn run(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    render(&store, ctx)
}

/// Print the cart as a table, or as JSON in `--json` mode.
pub fn render<B: StorageBackend>(store: &CartStore<B>, ctx: &Context) -> Result<()> {
    let pricing = store.pricing().context("Failed to price the cart")?;
    let view = CartView::new(store.items(), &pricing);

    if ctx.output.is_json() {
        ctx.output.json(&view);
        return Ok(());
    }

    ctx.output.header("Cart");

    if view.items.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    ctx.output
        .table_row(&["ID", "PRODUCT", "PRICE", "QTY", "SUBTOTAL"], &WIDTHS);
    for line in &view.items {
        ctx.output.table_row(
            &[
                &line.id.to_string(),
                &line.title,
                &line.price_display,
                &line.amount.to_string(),
                &line.subtotal_display,
            ],
            &WIDTHS,
        );
    }

    println!();
    ctx.output.kv("Items", &view.item_count.to_string());
    ctx.output.kv("Total", &view.total_display);

    Ok(())
}

/// Serializable snapshot of the cart with computed subtotals.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<LineView>,
    pub item_count: u64,
    pub currency: Currency,
    pub total: f64,
    pub total_display: String,
}

#[derive(Debug, Serialize)]
pub struct LineView {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub amount: u32,
    pub price: f64,
    pub price_display: String,
    pub subtotal: f64,
    pub subtotal_display: String,
}

impl CartView {
    pub fn new(items: &[LineItem], pricing: &CartPricing) -> Self {
        let items = items
            .iter()
            .map(|item| {
                let line = pricing.line(item.product_id);
                let zero = Money::zero(pricing.total.currency);
                let unit = line.map(|l| l.unit_price).unwrap_or(zero);
                let subtotal = line.map(|l| l.subtotal).unwrap_or(zero);
                LineView {
                    id: item.product_id,
                    title: item.title.clone(),
                    image: item.image_url.clone(),
                    amount: item.quantity,
                    price: item.unit_price,
                    price_display: unit.display(),
                    subtotal: subtotal.to_decimal(),
                    subtotal_display: subtotal.display(),
                }
            })
            .collect();

        Self {
            items,
            item_count: pricing.item_count,
            currency: pricing.total.currency,
            total: pricing.total.to_decimal(),
            total_display: pricing.total.display(),
        }
    }
}
