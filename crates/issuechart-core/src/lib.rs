//! Core domain for issuechart: issue aggregation and selection state.
//!
//! Everything that talks to the outside world does so through the trait
//! seams defined here ([`query::RestRequester`], [`bridge::Invoker`],
//! [`selection::KeyValueStore`], [`render::ChartRenderer`]); the
//! infrastructure and interaction crates supply the implementations.

pub mod aggregation;
pub mod bridge;
pub mod config;
pub mod error;
pub mod interval;
pub mod query;
pub mod record;
pub mod render;
pub mod selection;

// Re-export common error type
pub use error::ChartError;
