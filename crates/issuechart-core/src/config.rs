//! Gadget configuration model.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

pub const ENV_BASE_URL: &str = "JIRA_BASE_URL";
pub const ENV_EMAIL: &str = "JIRA_EMAIL";
pub const ENV_API_TOKEN: &str = "JIRA_API_TOKEN";
pub const ENV_APP_EMAIL: &str = "JIRA_APP_EMAIL";
pub const ENV_APP_API_TOKEN: &str = "JIRA_APP_API_TOKEN";

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GadgetConfig {
    /// Submitted through the configuration form; displayed read-only.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub site: SiteConfig,
    /// Elevated credentials for backend functions. Falls back to `site`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<Credentials>,
}

/// Issue tracker site and the user's own credentials.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub api_token: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub api_token: String,
}

impl SiteConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            api_token: self.api_token.clone(),
        }
    }
}

impl GadgetConfig {
    /// Fills empty values from the environment using `lookup`.
    ///
    /// Values already present in the file win.
    pub fn with_env_fallback<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        fill(&mut self.site.base_url, lookup(ENV_BASE_URL));
        fill(&mut self.site.email, lookup(ENV_EMAIL));
        fill(&mut self.site.api_token, lookup(ENV_API_TOKEN));

        if self.app.is_none() {
            if let (Some(email), Some(api_token)) = (lookup(ENV_APP_EMAIL), lookup(ENV_APP_API_TOKEN)) {
                self.app = Some(Credentials { email, api_token });
            }
        }
        self
    }

    /// Credentials used for backend functions.
    pub fn app_credentials(&self) -> Credentials {
        self.app
            .clone()
            .unwrap_or_else(|| self.site.credentials())
    }

    /// Checks that enough is configured to talk to the site.
    pub fn validate(&self) -> Result<()> {
        if self.site.base_url.trim().is_empty() {
            return Err(ChartError::config(format!(
                "site.base_url is not set (config.toml or {})",
                ENV_BASE_URL
            )));
        }
        if self.site.email.trim().is_empty() || self.site.api_token.trim().is_empty() {
            return Err(ChartError::config(format!(
                "site credentials are not set (config.toml or {}/{})",
                ENV_EMAIL, ENV_API_TOKEN
            )));
        }
        Ok(())
    }
}

fn fill(slot: &mut String, value: Option<String>) {
    if slot.is_empty() {
        if let Some(value) = value {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_fallback_fills_only_empty_values() {
        let config = GadgetConfig {
            site: SiteConfig {
                base_url: "https://file.example".into(),
                ..Default::default()
            },
            ..Default::default()
        }
        .with_env_fallback(env(&[
            (ENV_BASE_URL, "https://env.example"),
            (ENV_EMAIL, "me@example.com"),
            (ENV_API_TOKEN, "token"),
        ]));

        assert_eq!(config.site.base_url, "https://file.example");
        assert_eq!(config.site.email, "me@example.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_app_credentials_fall_back_to_site() {
        let mut config = GadgetConfig::default().with_env_fallback(env(&[
            (ENV_EMAIL, "me@example.com"),
            (ENV_API_TOKEN, "token"),
        ]));
        assert_eq!(config.app_credentials().email, "me@example.com");

        config = config.with_env_fallback(env(&[
            (ENV_APP_EMAIL, "bot@example.com"),
            (ENV_APP_API_TOKEN, "bot-token"),
        ]));
        assert_eq!(config.app_credentials().email, "bot@example.com");
    }

    #[test]
    fn test_validate_reports_missing_site() {
        let err = GadgetConfig::default().validate().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_toml_round_trip_shape() {
        let parsed: GadgetConfig = toml::from_str(
            r#"
            username = "alice"
            [site]
            base_url = "https://example.atlassian.net"
            email = "alice@example.com"
            api_token = "t"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.username, "alice");
        assert!(parsed.app.is_none());
    }
}
