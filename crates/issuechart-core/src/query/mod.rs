//! Fetching and aggregating issues through the host's request function.

pub mod pipeline;
pub mod request;

pub use pipeline::QueryPipeline;
pub use request::{Method, RestRequest, RestRequester, RestResponse};
