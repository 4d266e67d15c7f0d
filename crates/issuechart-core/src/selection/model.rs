//! Selection domain model.

use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// Storage keys, one per selection field.
pub mod keys {
    pub const PROJECT: &str = "selectedProject";
    pub const ISSUE_TYPE: &str = "selectedIssueType";
    pub const FIELD: &str = "selectedField";
    pub const NESTED_FIELD: &str = "nestedField";
    pub const JQL: &str = "jql";
    pub const INTERVAL: &str = "selectedInterval";
    pub const PRIORITY: &str = "selectedPriority";

    /// Every key the selection writes, in write order.
    pub const ALL: [&str; 7] = [PROJECT, ISSUE_TYPE, FIELD, NESTED_FIELD, JQL, INTERVAL, PRIORITY];
}

/// The user's structured choices.
///
/// Empty strings mean "not chosen".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Project key.
    pub project: String,
    /// Issue type name.
    pub issue_type: String,
    pub field: String,
    pub nested_field: String,
    pub priority: String,
    pub interval: Interval,
    /// Effective filter expression.
    pub jql: String,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flat `(key, value)` pairs for every field, empty ones included.
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            (keys::PROJECT, self.project.as_str()),
            (keys::ISSUE_TYPE, self.issue_type.as_str()),
            (keys::FIELD, self.field.as_str()),
            (keys::NESTED_FIELD, self.nested_field.as_str()),
            (keys::JQL, self.jql.as_str()),
            (keys::INTERVAL, self.interval.as_str()),
            (keys::PRIORITY, self.priority.as_str()),
        ]
    }
}

/// Where the selection stands in the configuration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionState {
    /// No project chosen.
    Unconfigured,
    /// Project chosen, issue type missing.
    CollectionChosen,
    /// Project and issue type chosen; the filter expression is derived.
    SubtypeChosen,
    /// Derived expression is further limited to one priority.
    PriorityRefined,
}

impl SelectionState {
    pub fn of(selection: &Selection) -> Self {
        match (
            selection.project.is_empty(),
            selection.issue_type.is_empty(),
            selection.priority.is_empty(),
        ) {
            (true, _, _) => SelectionState::Unconfigured,
            (false, true, _) => SelectionState::CollectionChosen,
            (false, false, true) => SelectionState::SubtypeChosen,
            (false, false, false) => SelectionState::PriorityRefined,
        }
    }

    /// Project and issue type are both chosen, so the expression is derived.
    pub fn is_derivable(self) -> bool {
        matches!(
            self,
            SelectionState::SubtypeChosen | SelectionState::PriorityRefined
        )
    }
}

/// Filter expression derived from the structured choices.
///
/// `None` unless both project and issue type are set.
pub fn derive_jql(project: &str, issue_type: &str, priority: &str) -> Option<String> {
    if project.is_empty() || issue_type.is_empty() {
        return None;
    }

    let mut jql = format!(
        "project = {} AND statusCategory != Done AND issuetype = {}",
        project, issue_type
    );
    if !priority.is_empty() {
        jql.push_str(&format!(" AND priority = \"{}\"", priority));
    }
    Some(jql)
}
