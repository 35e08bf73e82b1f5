//! KTP Storage Library
//!
//! This crate provides the client-local key-value storage abstraction and the
//! persistent catalog store built on top of it.
//!
//! # Layout
//!
//! - [`KeyValueStore`] is the raw string store, one value per key. Backends: an
//!   in-process map ([`MemoryKeyValueStore`]) and a directory with one file per key
//!   ([`LocalKeyValueStore`]).
//! - [`CatalogStore`] persists the ordered catalog metadata under a single key.
//!   [`KeyValueCatalogStore`] implements it over any [`KeyValueStore`].
//!
//! Keys must be non-empty and must not contain `..` or start with `/`. Key checks
//! are centralized in the `keys` module so all backends agree.

pub mod catalog;
pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use catalog::{CatalogError, CatalogStore, KeyValueCatalogStore};
pub use factory::{create_catalog_store, create_key_value_store};
pub use ktp_core::CatalogBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use traits::{KeyValueStore, StorageError, StorageResult};
