//! Issue aggregation: records in, stacked-bar buckets out.
//!
//! The pipeline is split into three pure steps so each can be tested on its
//! own: [`extract_tuples`] emits one unit tuple per field value,
//! [`filter_by_interval`] keeps the tuples in the current period and
//! [`merge_buckets`] folds duplicates together.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::interval::Interval;
use crate::record::Record;

/// Object keys tried, in order, when turning a nested value into a category.
const CATEGORY_KEYS: [&str; 4] = ["name", "value", "displayName", "key"];

/// An aggregated `(date, count, category)` tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    /// Creation day, `YYYY-MM-DD`.
    pub date: String,
    pub count: u64,
    pub category: String,
}

impl Bucket {
    pub fn new(date: impl Into<String>, count: u64, category: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            count,
            category: category.into(),
        }
    }
}

/// Whether a field value counts as present.
///
/// `null`, `false`, `0` and the empty string are treated as missing.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Turns one field element into its category label.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(map) => CATEGORY_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

/// Emits one `(day, 1, category)` tuple per element of `field` on every record.
///
/// Scalars count as single-element lists. With `nested` set, each element
/// is replaced by its `nested` key and elements lacking it are dropped.
/// Records without a `created` timestamp are skipped.
pub fn extract_tuples(records: &[Record], field: &str, nested: Option<&str>) -> Vec<Bucket> {
    let mut tuples = Vec::new();

    for record in records {
        let Some(value) = record.field(field).filter(|v| is_present(v)) else {
            continue;
        };
        let Some(day) = record.created_day() else {
            tracing::debug!("[Aggregation] Skipping {} without created date", record.key);
            continue;
        };

        let elements: &[Value] = match value {
            Value::Array(items) => items,
            single => std::slice::from_ref(single),
        };
        for element in elements {
            let element = match nested {
                Some(key) => match element.get(key).filter(|v| is_present(v)) {
                    Some(inner) => inner,
                    None => continue,
                },
                None => element,
            };
            tuples.push(Bucket::new(day, 1, stringify(element)));
        }
    }

    tuples
}

/// Keeps the tuples dated inside the period of `interval` that contains `now`.
///
/// Unparseable dates never match a recognized interval; an unrecognized
/// interval returns the input unchanged.
pub fn filter_by_interval(tuples: Vec<Bucket>, interval: &Interval, now: NaiveDate) -> Vec<Bucket> {
    if !interval.is_recognized() {
        return tuples;
    }

    tuples
        .into_iter()
        .filter(|tuple| {
            NaiveDate::parse_from_str(&tuple.date, "%Y-%m-%d")
                .is_ok_and(|date| interval.contains(now, date))
        })
        .collect()
}

/// Sums counts of tuples sharing `(date, category)`.
///
/// Output order is the order of first appearance.
pub fn merge_buckets(tuples: Vec<Bucket>) -> Vec<Bucket> {
    let mut positions: HashMap<(String, String), usize> = HashMap::new();
    let mut merged: Vec<Bucket> = Vec::new();

    for tuple in tuples {
        let key = (tuple.date.clone(), tuple.category.clone());
        if let Some(&index) = positions.get(&key) {
            merged[index].count += tuple.count;
        } else {
            positions.insert(key, merged.len());
            merged.push(tuple);
        }
    }

    merged
}

/// Full aggregation over already-fetched records.
pub fn aggregate(
    records: &[Record],
    field: &str,
    nested: Option<&str>,
    interval: &Interval,
    now: NaiveDate,
) -> Vec<Bucket> {
    let tuples = extract_tuples(records, field, nested);
    let filtered = filter_by_interval(tuples, interval, now);
    merge_buckets(filtered)
}
