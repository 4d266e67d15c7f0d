//! User selections: model, storage seam and the controller tying them together.

pub mod controller;
pub mod model;
pub mod store;

pub use controller::{SELECTION_REQUIRED, SelectionController};
pub use model::{Selection, SelectionState, derive_jql, keys};
pub use store::{InMemoryStore, KeyValueStore};
