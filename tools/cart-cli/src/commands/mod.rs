//! CLI command implementations.

pub mod add;
pub mod config;
pub mod products;
pub mod remove;
pub mod show;
pub mod update;

use cart_core::ProductId;
use clap::{Args, Subcommand};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product ID.
    pub id: ProductId,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Product ID.
    pub id: ProductId,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Product ID.
    pub id: ProductId,

    /// New quantity. Zero or less leaves the cart unchanged.
    #[arg(allow_negative_numbers = true)]
    pub quantity: i64,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Also look up stock for every product.
    #[arg(long)]
    pub stock: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Print the path of the config file in use.
    Path,
}
