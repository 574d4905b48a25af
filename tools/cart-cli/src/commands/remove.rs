//! Remove a product from the cart.

use anyhow::Result;

use super::{show, RemoveArgs};
use crate::context::Context;

/// Run the remove command.
pub async fn run(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let title = store.get(args.id).map(|item| item.title.clone());

    store.remove_product(args.id)?;

    if let Some(title) = title {
        ctx.output.success(&format!("Removed {}", title));
    }

    show::render(&store, ctx)
}
