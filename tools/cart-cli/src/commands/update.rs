//! Set the quantity of a product already in the cart.

use anyhow::Result;

use super::{show, UpdateArgs};
use crate::context::Context;

/// Run the update command.
pub async fn run(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;

    if args.quantity <= 0 {
        ctx.output
            .warn("Quantity must be at least 1; use `cart remove` to drop a product");
    } else if !store.contains(args.id) {
        ctx.output
            .warn(&format!("Product {} is not in the cart", args.id));
    }

    store.update_product_amount(args.id, args.quantity).await?;

    show::render(&store, ctx)
}
