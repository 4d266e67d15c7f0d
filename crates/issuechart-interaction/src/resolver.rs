//! Backend resolver: named functions callable through the invoke bridge.
//!
//! Functions run with whatever requester they were built with, typically
//! the app-level one. Failures are logged here in full and surface to the
//! caller only as a generic message.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use issuechart_core::ChartError;
use issuechart_core::bridge::{FETCH_PROJECTS, Invoker};
use issuechart_core::error::Result;
use issuechart_core::query::request::PROJECT_SEARCH_PATH;
use issuechart_core::query::{RestRequest, RestRequester};
use issuechart_core::record::{Project, ProjectPage};
use serde_json::Value;

/// One backend function.
#[async_trait]
pub trait ResolverFunction: Send + Sync {
    async fn call(&self, payload: Value) -> Result<Value>;
}

/// Registry of backend functions keyed by name.
#[derive(Default, Clone)]
pub struct Resolver {
    functions: HashMap<String, Arc<dyn ResolverFunction>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with every built-in function, running as `app`.
    pub fn with_defaults(app: Arc<dyn RestRequester>) -> Self {
        let mut resolver = Self::new();
        resolver.define(FETCH_PROJECTS, FetchProjects::new(app));
        resolver
    }

    /// Registers `function` under `name`, replacing any previous definition.
    pub fn define(&mut self, name: impl Into<String>, function: impl ResolverFunction + 'static) {
        self.functions.insert(name.into(), Arc::new(function));
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[async_trait]
impl Invoker for Resolver {
    async fn invoke(&self, name: &str, payload: Value) -> Result<Value> {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| ChartError::not_found("resolver function", name))?;
        function.call(payload).await
    }
}

/// `fetchProjects`: the project catalog's `values` array.
pub struct FetchProjects {
    requester: Arc<dyn RestRequester>,
}

impl FetchProjects {
    pub fn new(requester: Arc<dyn RestRequester>) -> Self {
        Self { requester }
    }

    /// Detailed failure; never leaves the backend.
    async fn fetch(&self) -> Result<Vec<Project>> {
        let response = self
            .requester
            .request(RestRequest::get(PROJECT_SEARCH_PATH))
            .await?
            .error_for_status()?;

        let page: ProjectPage = response.json()?;
        tracing::debug!("[Resolver] Fetched {} projects", page.values.len());
        Ok(page.values)
    }
}

#[async_trait]
impl ResolverFunction for FetchProjects {
    async fn call(&self, _payload: Value) -> Result<Value> {
        match self.fetch().await {
            Ok(projects) => Ok(serde_json::to_value(projects)?),
            Err(e) => {
                tracing::error!("[Resolver] {}", e);
                Err(ChartError::resolver("Error fetching projects"))
            }
        }
    }
}
