//! Catalog module.
//!
//! Product metadata and stock levels, plus the traits the cart uses to query
//! them.

mod inventory;
mod product;

pub use inventory::{StockLevel, StockOracle};
pub use product::{Product, ProductCatalog};
