use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use issuechart_core::ChartError;
use issuechart_core::aggregation::Bucket;
use issuechart_core::bridge::Invoker;
use issuechart_core::error::Result;
use issuechart_core::interval::Interval;
use issuechart_core::query::{QueryPipeline, RestRequest, RestRequester, RestResponse};
use issuechart_core::selection::{
    InMemoryStore, KeyValueStore, SELECTION_REQUIRED, SelectionController, SelectionState, keys,
};
use serde_json::{Value, json};

/// Serves canned bodies per path and counts calls.
#[derive(Default)]
struct StubRequester {
    bodies: HashMap<String, Value>,
    calls: Mutex<Vec<RestRequest>>,
}

impl StubRequester {
    fn with(mut self, path: &str, body: Value) -> Self {
        self.bodies.insert(path.to_string(), body);
        self
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RestRequester for StubRequester {
    async fn request(&self, request: RestRequest) -> Result<RestResponse> {
        let body = self.bodies.get(&request.path).cloned();
        self.calls.lock().unwrap().push(request);
        Ok(match body {
            Some(body) => RestResponse::new(200, "OK", body),
            None => RestResponse::new(404, "Not Found", Value::Null),
        })
    }
}

struct StubInvoker {
    projects: Option<Value>,
}

#[async_trait]
impl Invoker for StubInvoker {
    async fn invoke(&self, name: &str, _payload: Value) -> Result<Value> {
        assert_eq!(name, "fetchProjects");
        self.projects
            .clone()
            .ok_or_else(|| ChartError::resolver("Error fetching projects"))
    }
}

fn search_body() -> Value {
    json!({
        "startAt": 0,
        "maxResults": 50,
        "total": 3,
        "issues": [
            { "key": "GT-1", "fields": {
                "created": "2024-06-15T09:00:00.000+0000",
                "priority": { "name": "High" },
                "status": { "name": "Open", "id": "1" },
                "labels": ["ui", "api"],
                "resolution": null
            }},
            { "key": "GT-2", "fields": {
                "created": "2024-06-15T11:00:00.000+0000",
                "priority": { "name": "Low" },
                "status": { "name": "Open", "id": "1" },
                "labels": ["ui"]
            }},
            { "key": "GT-3", "fields": {
                "created": "2024-05-01T11:00:00.000+0000",
                "priority": { "name": "High" },
                "status": { "name": "Done", "id": "3" },
                "labels": "ops"
            }}
        ]
    })
}

fn controller_with(
    store: Arc<InMemoryStore>,
    requester: Arc<StubRequester>,
    projects: Option<Value>,
) -> SelectionController {
    SelectionController::restore(
        store,
        QueryPipeline::new(requester),
        Arc::new(StubInvoker { projects }),
    )
}

fn fresh() -> (Arc<InMemoryStore>, Arc<StubRequester>, SelectionController) {
    let store = Arc::new(InMemoryStore::new());
    let requester = Arc::new(
        StubRequester::default()
            .with("/rest/api/3/search", search_body())
            .with(
                "/rest/api/3/issuetype",
                json!([{ "id": "1", "name": "Bug" }, { "id": "2", "name": "Task" }, { "id": "9", "name": "Bug" }]),
            ),
    );
    let controller = controller_with(store.clone(), requester.clone(), None);
    (store, requester, controller)
}

#[test]
fn test_starts_unconfigured_with_error() {
    let (_, _, controller) = fresh();
    assert_eq!(controller.state(), SelectionState::Unconfigured);
    assert_eq!(controller.error(), Some(SELECTION_REQUIRED));
    assert_eq!(controller.selection().interval, Interval::Monthly);
    assert!(controller.selection().jql.is_empty());
    assert!(!controller.should_render_chart());
}

#[test]
fn test_project_then_issue_type_derives_expression() {
    let (store, _, mut controller) = fresh();

    controller.choose_project("GT");
    assert_eq!(controller.state(), SelectionState::CollectionChosen);
    assert!(controller.selection().jql.is_empty());
    assert_eq!(controller.error(), Some(SELECTION_REQUIRED));

    controller.choose_issue_type("Bug");
    assert_eq!(controller.state(), SelectionState::SubtypeChosen);
    assert_eq!(
        controller.selection().jql,
        "project = GT AND statusCategory != Done AND issuetype = Bug"
    );
    assert!(controller.error().is_none());
    assert_eq!(
        store.get(keys::JQL).unwrap().as_deref(),
        Some("project = GT AND statusCategory != Done AND issuetype = Bug")
    );

    controller.choose_priority("P1");
    assert_eq!(controller.state(), SelectionState::PriorityRefined);
    assert_eq!(
        controller.selection().jql,
        "project = GT AND statusCategory != Done AND issuetype = Bug AND priority = \"P1\""
    );
}

#[test]
fn test_manual_edit_overwritten_by_next_derivation() {
    let (_, _, mut controller) = fresh();
    controller.edit_filter_expression("assignee = currentUser()");
    assert_eq!(controller.selection().jql, "assignee = currentUser()");

    controller.choose_project("GT");
    assert!(controller.selection().jql.is_empty());

    controller.choose_issue_type("Task");
    controller.edit_filter_expression("project = GT");
    assert_eq!(controller.selection().jql, "project = GT");

    controller.choose_priority("High");
    assert_eq!(
        controller.selection().jql,
        "project = GT AND statusCategory != Done AND issuetype = Task AND priority = \"High\""
    );
}

#[test]
fn test_choosing_project_clears_nested_field_across_restart() {
    let (store, requester, mut controller) = fresh();
    controller.choose_nested_field("name");
    assert_eq!(store.get(keys::NESTED_FIELD).unwrap().as_deref(), Some("name"));

    let mut restarted = controller_with(store.clone(), requester.clone(), None);
    assert_eq!(restarted.selection().nested_field, "name");
    restarted.choose_project("OPS");
    assert!(restarted.selection().nested_field.is_empty());
    assert!(store.get(keys::NESTED_FIELD).unwrap().is_none());

    let next = controller_with(store, requester, None);
    assert!(next.selection().nested_field.is_empty());
    assert_eq!(next.selection().project, "OPS");
}

#[test]
fn test_manual_edit_survives_restart_until_derivation() {
    let (store, requester, mut controller) = fresh();
    controller.edit_filter_expression("assignee = currentUser()");

    let mut restarted = controller_with(store.clone(), requester.clone(), None);
    assert_eq!(restarted.selection().jql, "assignee = currentUser()");
    assert_eq!(restarted.error(), Some(SELECTION_REQUIRED));

    restarted.choose_project("GT");
    assert!(restarted.selection().jql.is_empty());
    assert!(store.get(keys::JQL).unwrap().is_none());

    let next = controller_with(store, requester, None);
    assert!(next.selection().jql.is_empty());
}

#[test]
fn test_reset_restores_defaults_and_clears_storage() {
    let (store, _, mut controller) = fresh();
    controller.choose_project("GT");
    controller.choose_issue_type("Bug");
    controller.choose_field("labels");
    controller.choose_interval(Interval::Weekly);
    controller.choose_priority("High");
    assert!(!store.is_empty());

    controller.reset();

    let selection = controller.selection();
    assert_eq!(selection.interval, Interval::Monthly);
    assert!(selection.project.is_empty());
    assert!(selection.issue_type.is_empty());
    assert!(selection.field.is_empty());
    assert!(selection.nested_field.is_empty());
    assert!(selection.priority.is_empty());
    assert!(selection.jql.is_empty());
    for key in keys::ALL {
        assert!(store.get(key).unwrap().is_none(), "{key} should be removed");
    }
}

#[test]
fn test_restore_reads_each_key_and_rederives() {
    let store = Arc::new(InMemoryStore::new());
    store.set(keys::PROJECT, "GT").unwrap();
    store.set(keys::ISSUE_TYPE, "Bug").unwrap();
    store.set(keys::FIELD, "labels").unwrap();
    store.set(keys::INTERVAL, "yearly").unwrap();
    store.set(keys::JQL, "stale manual text").unwrap();

    let controller = controller_with(store, Arc::new(StubRequester::default()), None);
    let selection = controller.selection();
    assert_eq!(selection.field, "labels");
    assert_eq!(selection.interval, Interval::Yearly);
    assert_eq!(
        selection.jql,
        "project = GT AND statusCategory != Done AND issuetype = Bug"
    );
    assert!(controller.chart_visible());
}

#[test]
fn test_render_gate_requires_nested_field_when_needed() {
    let (_, _, mut controller) = fresh();
    controller.choose_project("GT");
    controller.choose_issue_type("Bug");
    assert!(!controller.should_render_chart());

    controller.choose_field("status");
    assert!(controller.should_render_chart());

    controller.set_has_nested_fields(true);
    assert!(!controller.should_render_chart());

    controller.choose_nested_field("name");
    assert!(controller.should_render_chart());
    assert_eq!(controller.chart_field(), ("status", Some("name")));

    controller.set_has_nested_fields(false);
    assert_eq!(controller.chart_field(), ("status", None));
}

#[tokio::test]
async fn test_chart_counts_nested_values_of_object_field() {
    let (_, _, mut controller) = fresh();
    controller.choose_project("GT");
    controller.choose_issue_type("Bug");
    controller.choose_field("priority");

    let now = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let nested = controller.nested_field_options().await;
    assert!(nested.iter().any(|o| o.value == "name"));
    assert!(controller.has_nested_fields());
    assert!(controller.chart_at(now).await.is_none());

    controller.choose_nested_field("name");
    let chart = controller.chart_at(now).await.expect("chart should be visible");
    assert_eq!(
        chart.buckets,
        vec![
            Bucket::new("2024-06-15", 1, "High"),
            Bucket::new("2024-06-15", 1, "Low"),
        ]
    );
}

#[tokio::test]
async fn test_chart_aggregates_current_month() {
    let (_, requester, mut controller) = fresh();
    controller.choose_project("GT");
    controller.choose_issue_type("Bug");
    controller.choose_field("labels");

    let now = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let chart = controller.chart_at(now).await.expect("chart should be visible");
    assert_eq!(
        chart.buckets,
        vec![
            Bucket::new("2024-06-15", 2, "ui"),
            Bucket::new("2024-06-15", 1, "api"),
        ]
    );
    assert_eq!(chart.date_range, "01-06-2024 - 30-06-2024");
    assert_eq!(requester.call_count(), 1);
}

#[tokio::test]
async fn test_chart_hidden_while_error_set() {
    let (_, requester, mut controller) = fresh();
    controller.edit_filter_expression("project = GT");
    controller.choose_field("labels");
    assert!(controller.should_render_chart());
    assert!(controller.chart_at(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()).await.is_none());
    assert_eq!(requester.call_count(), 0);
}

#[tokio::test]
async fn test_option_lists() {
    let (_, _, mut controller) = fresh();
    assert!(controller.issue_type_options().await.is_empty());
    assert!(controller.field_options().await.is_empty());

    controller.choose_project("GT");
    let issue_types = controller.issue_type_options().await;
    let names: Vec<_> = issue_types.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(names, vec!["Bug", "Task"]);

    controller.choose_issue_type("Bug");
    let fields: Vec<_> = controller
        .field_options()
        .await
        .into_iter()
        .map(|o| o.value)
        .collect();
    assert!(fields.contains(&"labels".to_string()));
    assert!(!fields.contains(&"resolution".to_string()));

    let priorities: Vec<_> = controller
        .priority_options()
        .await
        .into_iter()
        .map(|o| o.value)
        .collect();
    assert_eq!(priorities, vec!["High", "Low"]);

    controller.choose_field("status");
    let mut nested: Vec<_> = controller
        .nested_field_options()
        .await
        .into_iter()
        .map(|o| o.value)
        .collect();
    nested.sort();
    assert_eq!(nested, vec!["id", "name"]);
    assert!(controller.has_nested_fields());

    controller.choose_field("labels");
    assert!(controller.nested_field_options().await.is_empty());
    assert!(!controller.has_nested_fields());

    let intervals = SelectionController::interval_options();
    assert_eq!(intervals.len(), 5);
    assert_eq!(intervals[2].value, "monthly");
    assert_eq!(intervals[2].label, "Monthly");
}

#[tokio::test]
async fn test_project_options_from_invoker() {
    let store = Arc::new(InMemoryStore::new());
    let projects = json!([
        { "id": "10000", "key": "GT", "name": "Gadget Team" },
        { "id": "10001", "key": "OPS", "name": "Operations" }
    ]);
    let controller = controller_with(store.clone(), Arc::new(StubRequester::default()), Some(projects));
    let options = controller.project_options().await;
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].label, "Gadget Team");
    assert_eq!(options[0].value, "GT");

    let failing = controller_with(store, Arc::new(StubRequester::default()), None);
    assert!(failing.project_options().await.is_empty());
}
