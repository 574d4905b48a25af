//! Key-value storage adapters for persisted cart state.
//!
//! Everything persisted goes through the small [`StorageBackend`] trait so the
//! backing store can be swapped: an in-memory map for tests, a directory of
//! JSON files for local tools, or Spin's Key-Value Store at the edge.
//!
//! # Example
//!
//! ```rust
//! use cart_storage::{Cache, MemoryStore};
//!
//! let cache = Cache::new(MemoryStore::new());
//! cache.set("@RocketShoes:cart", &Vec::<u64>::new()).unwrap();
//! let items: Option<Vec<u64>> = cache.get("@RocketShoes:cart").unwrap();
//! assert_eq!(items, Some(vec![]));
//! ```

mod backend;
mod error;
mod file;
mod kv;
mod memory;
#[cfg(target_arch = "wasm32")]
mod spin;

pub use backend::{BackendBounds, StorageBackend};
pub use error::StorageError;
pub use file::FileStore;
pub use kv::Cache;
pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use spin::SpinStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, FileStore, MemoryStore, StorageBackend, StorageError};
}
