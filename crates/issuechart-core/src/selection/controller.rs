//! Selection state controller.
//!
//! Owns the in-memory [`Selection`], mirrors it into a [`KeyValueStore`] and
//! applies the filter-expression derivation rule:
//!
//! - Choosing a project clears the nested field, stored key included.
//! - Any change to project, issue type or priority re-derives the
//!   expression. With project and issue type set it is rebuilt from the
//!   choices (overwriting manual edits) and the validation error clears;
//!   otherwise it is forced empty and the validation error is set.
//! - Manual edits are kept verbatim until the next derivation, across
//!   restarts too: restoring only derives when both choices are stored.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use crate::bridge::{FETCH_PROJECTS, Invoker};
use crate::error::Result;
use crate::interval::{self, Interval};
use crate::query::QueryPipeline;
use crate::record::Project;
use crate::render::{ChartData, SelectOption};
use crate::selection::model::{Selection, SelectionState, derive_jql, keys};
use crate::selection::store::KeyValueStore;

/// Validation text shown while project or issue type is missing.
///
/// Mentions priority even though priority is optional.
pub const SELECTION_REQUIRED: &str = "Please select a project, issue type, and priority.";

pub struct SelectionController {
    selection: Selection,
    error: Option<String>,
    has_nested_fields: bool,
    store: Arc<dyn KeyValueStore>,
    pipeline: QueryPipeline,
    invoker: Arc<dyn Invoker>,
}

impl SelectionController {
    /// Restores the selection from `store`.
    ///
    /// The expression is re-derived only when project and issue type are
    /// both stored; otherwise the stored expression is kept as is and the
    /// validation error is set.
    pub fn restore(
        store: Arc<dyn KeyValueStore>,
        pipeline: QueryPipeline,
        invoker: Arc<dyn Invoker>,
    ) -> Self {
        let defaults = Selection::default();
        let selection = Selection {
            project: store.get_or(keys::PROJECT, &defaults.project),
            issue_type: store.get_or(keys::ISSUE_TYPE, &defaults.issue_type),
            field: store.get_or(keys::FIELD, &defaults.field),
            nested_field: store.get_or(keys::NESTED_FIELD, &defaults.nested_field),
            priority: store.get_or(keys::PRIORITY, &defaults.priority),
            interval: Interval::from(store.get_or(keys::INTERVAL, defaults.interval.as_str())),
            jql: store.get_or(keys::JQL, &defaults.jql),
        };

        let mut controller = Self {
            selection,
            error: None,
            has_nested_fields: false,
            store,
            pipeline,
            invoker,
        };
        if controller.state().is_derivable() {
            controller.derive();
        } else {
            // A stored manual expression stays until the next derivation.
            controller.error = Some(SELECTION_REQUIRED.to_string());
        }
        controller.persist();
        controller
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn state(&self) -> SelectionState {
        SelectionState::of(&self.selection)
    }

    /// Validation error, if any. Suppresses the chart while set.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_nested_fields(&self) -> bool {
        self.has_nested_fields
    }

    pub fn set_has_nested_fields(&mut self, has_nested_fields: bool) {
        self.has_nested_fields = has_nested_fields;
    }

    /// Also drops the nested field, in memory and in storage.
    pub fn choose_project(&mut self, project: impl Into<String>) {
        self.selection.project = project.into();
        self.selection.nested_field.clear();
        self.forget(keys::NESTED_FIELD);
        self.derive();
        self.persist();
    }

    pub fn choose_issue_type(&mut self, issue_type: impl Into<String>) {
        self.selection.issue_type = issue_type.into();
        self.derive();
        self.persist();
    }

    pub fn choose_priority(&mut self, priority: impl Into<String>) {
        self.selection.priority = priority.into();
        self.derive();
        self.persist();
    }

    pub fn choose_field(&mut self, field: impl Into<String>) {
        self.selection.field = field.into();
        self.persist();
    }

    pub fn choose_nested_field(&mut self, nested_field: impl Into<String>) {
        self.selection.nested_field = nested_field.into();
        self.persist();
    }

    pub fn choose_interval(&mut self, interval: Interval) {
        self.selection.interval = interval;
        self.persist();
    }

    /// Free-text edit of the filter expression. Survives until the next derivation.
    pub fn edit_filter_expression(&mut self, jql: impl Into<String>) {
        self.selection.jql = jql.into();
        self.persist();
    }

    /// Clears every stored key and returns to defaults (interval `monthly`).
    ///
    /// Nothing is written back afterwards, so storage stays empty until the
    /// next choice.
    pub fn reset(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::error!("[Selection] Failed to clear storage: {}", e);
        }
        self.selection = Selection::default();
        self.has_nested_fields = false;
        self.derive();
        tracing::info!("[Selection] Selection reset");
    }

    /// Expression present, field chosen, and nested field chosen when one is needed.
    pub fn should_render_chart(&self) -> bool {
        !self.selection.jql.is_empty()
            && !self.selection.field.is_empty()
            && (!self.has_nested_fields || !self.selection.nested_field.is_empty())
    }

    /// Whether a chart is shown at all: no validation error and rendering allowed.
    pub fn chart_visible(&self) -> bool {
        self.error.is_none() && self.should_render_chart()
    }

    /// Field handed to the aggregation, plus the key read inside each of its
    /// values while a nested field is both required and chosen.
    pub fn chart_field(&self) -> (&str, Option<&str>) {
        let nested = Some(self.selection.nested_field.as_str())
            .filter(|nested| self.has_nested_fields && !nested.is_empty());
        (self.selection.field.as_str(), nested)
    }

    /// Chart for the current selection, or `None` when the chart is hidden.
    pub async fn chart(&self) -> Option<ChartData> {
        self.chart_at(interval::today()).await
    }

    pub async fn chart_at(&self, now: NaiveDate) -> Option<ChartData> {
        if !self.chart_visible() {
            return None;
        }
        let interval = self.selection.interval.clone();
        let (field, nested) = self.chart_field();
        let buckets = self
            .pipeline
            .build_nested_aggregation_at(&self.selection.jql, field, nested, &interval, now)
            .await;
        Some(ChartData {
            buckets,
            date_range: interval.date_range_label_at(now),
            interval,
        })
    }

    /// Project options via the backend `fetchProjects` function.
    pub async fn project_options(&self) -> Vec<SelectOption> {
        match self.fetch_projects().await {
            Ok(projects) => projects.iter().map(SelectOption::from).collect(),
            Err(e) => {
                tracing::error!("[Selection] Error fetching projects: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_projects(&self) -> Result<Vec<Project>> {
        let value = self.invoker.invoke(FETCH_PROJECTS, json!({})).await?;
        Ok(serde_json::from_value::<Vec<Project>>(value)?)
    }

    /// Issue type options; empty until a project is chosen.
    pub async fn issue_type_options(&self) -> Vec<SelectOption> {
        if self.selection.project.is_empty() {
            return Vec::new();
        }
        self.pipeline
            .fetch_issue_types()
            .await
            .iter()
            .map(SelectOption::from)
            .collect()
    }

    /// Field options; empty while there is no expression.
    pub async fn field_options(&self) -> Vec<SelectOption> {
        if self.selection.jql.is_empty() {
            return Vec::new();
        }
        self.pipeline
            .extract_distinct_field_names(&self.selection.jql)
            .await
            .into_iter()
            .map(SelectOption::plain)
            .collect()
    }

    /// Nested field options for the chosen field. Updates the nested-fields flag.
    pub async fn nested_field_options(&mut self) -> Vec<SelectOption> {
        if self.selection.jql.is_empty() || self.selection.field.is_empty() {
            self.has_nested_fields = false;
            return Vec::new();
        }
        let names = self
            .pipeline
            .extract_nested_field_names(&self.selection.jql, &self.selection.field)
            .await;
        self.has_nested_fields = !names.is_empty();
        names.into_iter().map(SelectOption::plain).collect()
    }

    /// Priority options; empty while there is no expression.
    pub async fn priority_options(&self) -> Vec<SelectOption> {
        if self.selection.jql.is_empty() {
            return Vec::new();
        }
        self.pipeline
            .extract_distinct_priority_names(&self.selection.jql)
            .await
            .into_iter()
            .map(SelectOption::plain)
            .collect()
    }

    /// The five selectable intervals.
    pub fn interval_options() -> Vec<SelectOption> {
        Interval::SELECTABLE.iter().map(SelectOption::from).collect()
    }

    fn derive(&mut self) {
        match derive_jql(
            &self.selection.project,
            &self.selection.issue_type,
            &self.selection.priority,
        ) {
            Some(jql) => {
                tracing::debug!("[Selection] Derived filter expression: {}", jql);
                self.selection.jql = jql;
                self.error = None;
            }
            None => {
                self.selection.jql.clear();
                self.forget(keys::JQL);
                self.error = Some(SELECTION_REQUIRED.to_string());
            }
        }
    }

    /// Drops a stored key whose in-memory value was cleared; `persist` skips empties.
    fn forget(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!("[Selection] Failed to remove '{}': {}", key, e);
        }
    }

    /// Writes every non-empty field under its key. Failures are logged only.
    fn persist(&self) {
        for (key, value) in self.selection.entries() {
            if value.is_empty() {
                continue;
            }
            if let Err(e) = self.store.set(key, value) {
                tracing::warn!("[Selection] Failed to persist '{}': {}", key, e);
            }
        }
    }
}
