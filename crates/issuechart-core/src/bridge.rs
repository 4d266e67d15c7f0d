//! Host-runtime boundary: named backend functions invoked from the UI side.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Name of the backend function returning the project catalog.
pub const FETCH_PROJECTS: &str = "fetchProjects";

/// Opaque invoke mechanism for backend functions.
///
/// Implementations decide which credentials a function runs with. Errors
/// returned here carry only a generic message; details stay on the backend.
#[async_trait]
pub trait Invoker: Send + Sync {
    async fn invoke(&self, name: &str, payload: Value) -> Result<Value>;
}
