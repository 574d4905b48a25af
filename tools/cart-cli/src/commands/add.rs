//! Add one unit of a product.

use anyhow::Result;

use super::{show, AddArgs};
use crate::context::Context;

/// Run the add command.
pub async fn run(args: AddArgs, ctx: &Context) -> Result<()> {
    let mut store = ctx.open_store()?;
    let before = store.get(args.id).map(|item| item.quantity).unwrap_or(0);

    store.add_product(args.id).await?;

    if let Some(item) = store.get(args.id) {
        if before == 0 {
            ctx.output.success(&format!("Added {}", item.title));
        } else {
            ctx.output
                .success(&format!("{} now x{}", item.title, item.quantity));
        }
    }

    show::render(&store, ctx)
}
