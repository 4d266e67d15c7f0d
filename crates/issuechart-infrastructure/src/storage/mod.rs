//! Storage layer for atomic file operations.

mod atomic_toml;
mod local_store;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
pub use local_store::FileKeyValueStore;
