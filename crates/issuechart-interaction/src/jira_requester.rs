//! JiraRequester - authenticated REST request function backed by reqwest.
//!
//! Implements [`RestRequester`] against a Jira Cloud site using basic auth
//! (account e-mail + API token). One instance acts for the user, another
//! for the app when backend functions need elevated credentials.

use std::time::Duration;

use async_trait::async_trait;
use issuechart_core::ChartError;
use issuechart_core::config::{Credentials, GadgetConfig};
use issuechart_core::error::Result;
use issuechart_core::query::{Method, RestRequest, RestRequester, RestResponse};
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::Value;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Request function talking to one Jira site with one set of credentials.
#[derive(Clone)]
pub struct JiraRequester {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl JiraRequester {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Acts with the user's own credentials.
    pub fn for_user(config: &GadgetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(&config.site.base_url, config.site.credentials()))
    }

    /// Acts with the app credentials (falls back to the user's).
    pub fn as_app(config: &GadgetConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(&config.site.base_url, config.app_credentials()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the outgoing request without sending it.
    pub fn build(&self, request: &RestRequest) -> Result<reqwest::Request> {
        let url = format!("{}{}", self.base_url, request.path);
        let builder = match request.method {
            Method::Get => self.client.get(url),
        };

        builder
            .query(&request.query)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .basic_auth(&self.credentials.email, Some(&self.credentials.api_token))
            .build()
            .map_err(|err| ChartError::transport(format!("Invalid request: {err}")))
    }
}

#[async_trait]
impl RestRequester for JiraRequester {
    async fn request(&self, request: RestRequest) -> Result<RestResponse> {
        let outgoing = self.build(&request)?;
        tracing::debug!("[Jira] {} {}", outgoing.method(), outgoing.url().path());

        let response = self
            .client
            .execute(outgoing)
            .await
            .map_err(|err| ChartError::transport(format!("Jira request failed: {err}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ChartError::transport(format!("Failed to read Jira response: {err}")))?;

        Ok(RestResponse::new(status.as_u16(), status_text(status), parse_body(&text)))
    }
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("").to_string()
}

/// JSON body, the raw text when it is not JSON, `null` when empty.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
