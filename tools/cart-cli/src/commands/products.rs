//! List the storefront catalog.

use anyhow::{Context as _, Result};
use cart_core::Money;
use cart_core::{ProductCatalog, ProductId, StockOracle};
use serde::Serialize;

use super::ProductsArgs;
use crate::context::Context;

#[derive(Serialize)]
struct ProductRow {
    id: ProductId,
    title: String,
    price: f64,
    image: String,
    in_cart: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stock: Option<i64>,
}

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let api = ctx.api();
    let store = ctx.open_store()?;
    let in_cart = store.quantities();
    let currency = store.config().currency;

    let products = api
        .products()
        .await
        .with_context(|| format!("Failed to load products from {}", ctx.config.api.base_url))?;

    let mut rows = Vec::with_capacity(products.len());
    for product in products {
        let stock = if args.stock {
            match api.stock(product.id).await {
                Ok(level) => level.map(|l| l.available_quantity),
                Err(e) => {
                    tracing::warn!(product_id = %product.id, error = %e, "stock lookup failed");
                    None
                }
            }
        } else {
            None
        };

        rows.push(ProductRow {
            id: product.id,
            in_cart: in_cart.get(&product.id).copied().unwrap_or(0),
            price: product.price,
            title: product.title,
            image: product.image,
            stock,
        });
    }

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header("Products");

    if rows.is_empty() {
        ctx.output.info("The catalog is empty.");
        return Ok(());
    }

    let widths = [6, 36, 12, 8, 8];
    ctx.output
        .table_row(&["ID", "PRODUCT", "PRICE", "IN CART", "STOCK"], &widths);
    for row in &rows {
        let price = Money::from_decimal(row.price, currency)
            .map_or_else(|| row.price.to_string(), |m| m.display());
        let stock = row.stock.map_or_else(|| "-".to_string(), |s| s.to_string());
        ctx.output.table_row(
            &[
                &row.id.to_string(),
                &row.title,
                &price,
                &row.in_cart.to_string(),
                &stock,
            ],
            &widths,
        );
    }

    Ok(())
}
