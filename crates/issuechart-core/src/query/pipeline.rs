//! Query & aggregation pipeline.
//!
//! Every public operation here degrades to an empty result on failure: the
//! cause is logged and the caller sees "no data". Nothing is cached, retried
//! or deduplicated; each call issues a fresh request and only the first page
//! the service returns is considered.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use crate::aggregation::{self, Bucket};
use crate::error::Result;
use crate::interval::{self, Interval};
use crate::query::request::{ISSUE_TYPE_PATH, RestRequest, RestRequester, SEARCH_PATH};
use crate::record::{IssueType, Record, SearchPage};

#[derive(Clone)]
pub struct QueryPipeline {
    requester: Arc<dyn RestRequester>,
}

impl QueryPipeline {
    pub fn new(requester: Arc<dyn RestRequester>) -> Self {
        Self { requester }
    }

    async fn search(&self, jql: &str) -> Result<Vec<Record>> {
        let request = RestRequest::get(SEARCH_PATH).with_query("jql", jql);
        let response = self.requester.request(request).await?.error_for_status()?;
        let page: SearchPage = response.json()?;
        if page.total > page.issues.len() as u64 {
            tracing::debug!(
                "[Pipeline] Using first page only: {} of {} issues",
                page.issues.len(),
                page.total
            );
        }
        Ok(page.issues)
    }

    async fn issue_types(&self) -> Result<Vec<IssueType>> {
        let response = self
            .requester
            .request(RestRequest::get(ISSUE_TYPE_PATH))
            .await?
            .error_for_status()?;
        response.json()
    }

    /// Fetches the records matching `jql`. Failures are logged and yield an empty list.
    pub async fn fetch_records(&self, jql: &str) -> Vec<Record> {
        match self.search(jql).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("[Pipeline] Error fetching issues: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetches the issue type catalog with duplicate names removed.
    pub async fn fetch_issue_types(&self) -> Vec<IssueType> {
        match self.issue_types().await {
            Ok(types) => dedup_by_name(types),
            Err(e) => {
                tracing::error!("[Pipeline] Error fetching issue types: {}", e);
                Vec::new()
            }
        }
    }

    /// Names of every field that is non-null on at least one matching record.
    pub async fn extract_distinct_field_names(&self, jql: &str) -> Vec<String> {
        let records = self.fetch_records(jql).await;
        field_names(&records)
    }

    /// Distinct `priority.name` values across the matching records.
    pub async fn extract_distinct_priority_names(&self, jql: &str) -> Vec<String> {
        let records = self.fetch_records(jql).await;
        priority_names(&records)
    }

    /// String-valued keys of `field` when it holds an object.
    pub async fn extract_nested_field_names(&self, jql: &str, field: &str) -> Vec<String> {
        let records = self.fetch_records(jql).await;
        nested_field_names(&records, field)
    }

    /// Buckets of `field` values per creation day, limited to the current `interval`.
    pub async fn build_aggregation(&self, jql: &str, field: &str, interval: &Interval) -> Vec<Bucket> {
        self.build_aggregation_at(jql, field, interval, interval::today())
            .await
    }

    /// Same as [`QueryPipeline::build_aggregation`] with an explicit "now".
    pub async fn build_aggregation_at(
        &self,
        jql: &str,
        field: &str,
        interval: &Interval,
        now: NaiveDate,
    ) -> Vec<Bucket> {
        self.build_nested_aggregation_at(jql, field, None, interval, now)
            .await
    }

    /// Aggregates `field.nested` when `nested` is given, else `field` itself.
    pub async fn build_nested_aggregation_at(
        &self,
        jql: &str,
        field: &str,
        nested: Option<&str>,
        interval: &Interval,
        now: NaiveDate,
    ) -> Vec<Bucket> {
        let records = self.fetch_records(jql).await;
        let buckets = aggregation::aggregate(&records, field, nested, interval, now);
        tracing::debug!(
            "[Pipeline] Aggregated {} records into {} buckets ({}{}, {})",
            records.len(),
            buckets.len(),
            field,
            nested.map(|key| format!(".{key}")).unwrap_or_default(),
            interval
        );
        buckets
    }

    /// Label of the current period, e.g. `01-06-2024 - 30-06-2024`.
    pub fn date_range_label(&self, interval: &Interval) -> String {
        interval.date_range_label()
    }
}

fn dedup_by_name(types: Vec<IssueType>) -> Vec<IssueType> {
    let mut seen = HashSet::new();
    types
        .into_iter()
        .filter(|issue_type| seen.insert(issue_type.name.clone()))
        .collect()
}

/// Union of non-null field keys, in first-seen order.
pub fn field_names(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for record in records {
        for (name, value) in &record.fields {
            if !value.is_null() && seen.insert(name.as_str()) {
                names.push(name.clone());
            }
        }
    }
    names
}

/// Distinct priority names, in first-seen order.
pub fn priority_names(records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(Record::priority_name)
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Keys with string values on the first object-valued occurrence of `field`.
pub fn nested_field_names(records: &[Record], field: &str) -> Vec<String> {
    records
        .iter()
        .find_map(|record| record.field(field).and_then(Value::as_object))
        .map(|object| {
            object
                .iter()
                .filter(|(_, value)| value.is_string())
                .map(|(key, _)| key.clone())
                .collect()
        })
        .unwrap_or_default()
}
