//! The authenticated request function the host supplies.
//!
//! Callers only provide a method, a path and query parameters. How the
//! request is authenticated (user token, app credentials) is the
//! implementation's business.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ChartError, Result};

/// Search endpoint; takes a `jql` query parameter.
pub const SEARCH_PATH: &str = "/rest/api/3/search";
/// Issue type catalog endpoint.
pub const ISSUE_TYPE_PATH: &str = "/rest/api/3/issuetype";
/// Project catalog endpoint.
pub const PROJECT_SEARCH_PATH: &str = "/rest/api/3/project/search";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
}

/// A request as the caller describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl RestRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

/// Response shape handed back by the request function.
#[derive(Debug, Clone, PartialEq)]
pub struct RestResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Value,
}

impl RestResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: Value) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body,
        }
    }

    /// True for 2xx statuses.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserializes the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }

    /// Converts a non-success response into [`ChartError::Http`].
    pub fn error_for_status(self) -> Result<Self> {
        if self.ok() {
            Ok(self)
        } else {
            Err(ChartError::http(self.status, self.status_text))
        }
    }
}

/// Authenticated request function.
///
/// Returns `Err` only when no response was obtained at all; HTTP error
/// statuses come back as a [`RestResponse`] with `ok() == false`.
#[async_trait]
pub trait RestRequester: Send + Sync {
    async fn request(&self, request: RestRequest) -> Result<RestResponse>;
}
