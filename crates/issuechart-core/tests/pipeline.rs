use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use issuechart_core::ChartError;
use issuechart_core::aggregation::Bucket;
use issuechart_core::error::Result;
use issuechart_core::interval::Interval;
use issuechart_core::query::{Method, QueryPipeline, RestRequest, RestRequester, RestResponse};
use serde_json::{Value, json};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

/// Returns the same outcome for every request and remembers what was asked.
struct FixedRequester {
    outcome: std::result::Result<RestResponse, ChartError>,
    seen: Mutex<Vec<RestRequest>>,
}

impl FixedRequester {
    fn responding(status: u16, status_text: &str, body: Value) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(RestResponse::new(status, status_text, body)),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing(error: ChartError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(error),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl RestRequester for FixedRequester {
    async fn request(&self, request: RestRequest) -> Result<RestResponse> {
        self.seen.lock().unwrap().push(request);
        self.outcome.clone()
    }
}

/// Collects `(level, message)` for every event emitted while installed.
#[derive(Clone, Default)]
struct CapturedEvents(Arc<Mutex<Vec<(Level, String)>>>);

impl CapturedEvents {
    fn errors(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == Level::ERROR)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));
        self.0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), message));
    }
}

fn june_15() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

#[tokio::test]
async fn test_fetch_records_sends_jql_query() {
    let requester = FixedRequester::responding(200, "OK", json!({ "issues": [{ "key": "GT-1", "fields": {} }] }));
    let pipeline = QueryPipeline::new(requester.clone());

    let records = pipeline.fetch_records("project = GT").await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].key, "GT-1");

    let seen = requester.seen.lock().unwrap();
    assert_eq!(seen[0].method, Method::Get);
    assert_eq!(seen[0].path, "/rest/api/3/search");
    assert_eq!(seen[0].query, vec![("jql".to_string(), "project = GT".to_string())]);
}

#[tokio::test]
async fn test_non_success_response_logs_error() {
    let events = CapturedEvents::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(events.clone()));

    let pipeline = QueryPipeline::new(FixedRequester::responding(401, "Unauthorized", Value::Null));
    assert!(pipeline.fetch_records("project = GT").await.is_empty());

    let errors = events.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("[Pipeline] Error fetching issues"));
    assert!(errors[0].contains("401 Unauthorized"));
}

#[tokio::test]
async fn test_non_success_response_yields_empty() {
    let pipeline = QueryPipeline::new(FixedRequester::responding(
        400,
        "Bad Request",
        json!({ "errorMessages": ["bad jql"] }),
    ));
    assert!(pipeline.fetch_records("project = ").await.is_empty());
    assert!(pipeline.fetch_issue_types().await.is_empty());
    assert!(pipeline.extract_distinct_field_names("x").await.is_empty());
    assert!(pipeline.extract_distinct_priority_names("x").await.is_empty());
    assert!(
        pipeline
            .build_aggregation_at("x", "labels", &Interval::Monthly, june_15())
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn test_transport_failure_yields_empty() {
    let pipeline = QueryPipeline::new(FixedRequester::failing(ChartError::transport(
        "connection refused",
    )));
    assert!(pipeline.fetch_records("project = GT").await.is_empty());
    assert!(pipeline.fetch_issue_types().await.is_empty());
}

#[tokio::test]
async fn test_malformed_body_yields_empty() {
    let pipeline = QueryPipeline::new(FixedRequester::responding(200, "OK", json!("not a page")));
    assert!(pipeline.fetch_records("project = GT").await.is_empty());
}

#[tokio::test]
async fn test_only_first_page_is_used() {
    let pipeline = QueryPipeline::new(FixedRequester::responding(
        200,
        "OK",
        json!({
            "startAt": 0,
            "maxResults": 1,
            "total": 500,
            "issues": [{ "key": "GT-1", "fields": { "created": "2024-06-15T01:00:00.000+0000", "issuetype": { "name": "Bug" } } }]
        }),
    ));

    let buckets = pipeline
        .build_aggregation_at("project = GT", "issuetype", &Interval::Daily, june_15())
        .await;
    assert_eq!(buckets, vec![Bucket::new("2024-06-15", 1, "Bug")]);
}

#[tokio::test]
async fn test_every_call_fetches_again() {
    let requester = FixedRequester::responding(200, "OK", json!({ "issues": [] }));
    let pipeline = QueryPipeline::new(requester.clone());
    pipeline.fetch_records("project = GT").await;
    pipeline.fetch_records("project = GT").await;
    pipeline.extract_distinct_field_names("project = GT").await;
    assert_eq!(requester.seen.lock().unwrap().len(), 3);
}
