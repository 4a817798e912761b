//! Persistence adapter for the storefront backend.
//!
//! State is stored as whole JSON documents under string keys. Two backends are
//! provided: an in-memory map for tests and ephemeral runs, and a flat-file
//! backend writing one `<key>.json` document per key.

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use error::{Result, StorageError};
pub use file::JsonFileStore;
pub use memory::InMemoryStore;
pub use store::{KeyValueStore, KeyValueStoreExt, validate_key};
