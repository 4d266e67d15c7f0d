//! Toolkit-independent view models and renderer seams.
//!
//! The selection and aggregation logic only ever produces these types; any
//! front end (terminal, web, host UI kit) supplies the renderers.

use serde::{Deserialize, Serialize};

use crate::aggregation::Bucket;
use crate::interval::Interval;
use crate::record::{IssueType, Project};

/// One entry of a renderable option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose label and value are the same text.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            label: text.clone(),
            value: text,
        }
    }
}

impl From<&Project> for SelectOption {
    fn from(project: &Project) -> Self {
        SelectOption::new(&project.name, &project.key)
    }
}

impl From<&IssueType> for SelectOption {
    fn from(issue_type: &IssueType) -> Self {
        SelectOption::plain(&issue_type.name)
    }
}

impl From<&Interval> for SelectOption {
    fn from(interval: &Interval) -> Self {
        SelectOption::new(interval.label(), interval.as_str())
    }
}

/// Data behind one stacked bar chart.
///
/// x = `Bucket::date`, y = `Bucket::count`, colour = `Bucket::category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartData {
    pub buckets: Vec<Bucket>,
    pub interval: Interval,
    /// e.g. `01-06-2024 - 30-06-2024`
    pub date_range: String,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

pub trait ChartRenderer {
    fn render_chart(&self, chart: &ChartData) -> String;
}

pub trait OptionListRenderer {
    fn render_options(&self, label: &str, options: &[SelectOption]) -> String;
}
