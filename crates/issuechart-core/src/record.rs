//! Records and catalog entries returned by the issue tracker.
//!
//! These mirror the JSON the tracker sends. They are read-only from this
//! crate's point of view; nothing here mutates or writes them back.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single issue as returned by the search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Record {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    /// Named fields. Values may be scalars, lists or nested objects.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Returns the raw field value, treating JSON `null` as absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|value| !value.is_null())
    }

    /// Returns the `created` timestamp string, if any.
    pub fn created(&self) -> Option<&str> {
        self.fields.get("created").and_then(Value::as_str)
    }

    /// Day part of the `created` timestamp (everything before the `T`).
    pub fn created_day(&self) -> Option<&str> {
        self.created()
            .map(|created| created.split('T').next().unwrap_or(created))
    }

    /// Returns `fields.priority.name`, if present.
    pub fn priority_name(&self) -> Option<&str> {
        self.field("priority")
            .and_then(|priority| priority.get("name"))
            .and_then(Value::as_str)
    }
}

/// One page of search results. Only the first page is ever requested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub issues: Vec<Record>,
    #[serde(default)]
    pub start_at: u64,
    #[serde(default)]
    pub max_results: u64,
    #[serde(default)]
    pub total: u64,
}

/// Collection catalog entry (a project).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    pub key: String,
    pub name: String,
}

/// Paged project catalog as returned by `/project/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectPage {
    #[serde(default)]
    pub values: Vec<Project>,
}

/// Subtype catalog entry (an issue type).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueType {
    #[serde(default)]
    pub id: String,
    pub name: String,
}
