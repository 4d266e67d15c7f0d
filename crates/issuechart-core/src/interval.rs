//! Time-window granularity used to filter buckets to "now".

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label format used for the selected date range.
const LABEL_FORMAT: &str = "%d-%m-%Y";

/// The interval a chart is filtered to.
///
/// Unrecognized values are kept verbatim in [`Interval::Other`]; they filter
/// nothing and label the range as a single day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Interval {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
    Other(String),
}

impl Interval {
    /// The five selectable intervals, in display order.
    pub const SELECTABLE: [Interval; 5] = [
        Interval::Daily,
        Interval::Weekly,
        Interval::Monthly,
        Interval::Quarterly,
        Interval::Yearly,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Interval::Daily => "daily",
            Interval::Weekly => "weekly",
            Interval::Monthly => "monthly",
            Interval::Quarterly => "quarterly",
            Interval::Yearly => "yearly",
            Interval::Other(raw) => raw,
        }
    }

    /// Human label for option lists.
    pub fn label(&self) -> &str {
        match self {
            Interval::Daily => "Daily",
            Interval::Weekly => "Weekly",
            Interval::Monthly => "Monthly",
            Interval::Quarterly => "Quarterly",
            Interval::Yearly => "Yearly",
            Interval::Other(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Interval::Other(_))
    }

    /// First and last day of the period containing `now`.
    ///
    /// Weeks are ISO weeks (Monday to Sunday). An unrecognized interval
    /// yields `(now, now)`.
    pub fn period_bounds(&self, now: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Interval::Daily | Interval::Other(_) => (now, now),
            Interval::Weekly => {
                let start = now - Duration::days(i64::from(now.weekday().num_days_from_monday()));
                (start, start + Duration::days(6))
            }
            Interval::Monthly => month_bounds(now.year(), now.month()),
            Interval::Quarterly => {
                let first_month = (now.month0() / 3) * 3 + 1;
                let (start, _) = month_bounds(now.year(), first_month);
                let (_, end) = month_bounds(now.year(), first_month + 2);
                (start, end)
            }
            Interval::Yearly => (
                ymd(now.year(), 1, 1),
                ymd(now.year(), 12, 31),
            ),
        }
    }

    /// Whether `date` falls in the same period as `now`.
    ///
    /// Unrecognized intervals accept every date.
    pub fn contains(&self, now: NaiveDate, date: NaiveDate) -> bool {
        match self {
            Interval::Daily => date == now,
            Interval::Weekly => date.iso_week() == now.iso_week(),
            Interval::Monthly => date.year() == now.year() && date.month() == now.month(),
            Interval::Quarterly => date.year() == now.year() && date.month0() / 3 == now.month0() / 3,
            Interval::Yearly => date.year() == now.year(),
            Interval::Other(_) => true,
        }
    }

    /// `DD-MM-YYYY - DD-MM-YYYY` for the period containing `now`.
    pub fn date_range_label_at(&self, now: NaiveDate) -> String {
        let (start, end) = self.period_bounds(now);
        format!(
            "{} - {}",
            start.format(LABEL_FORMAT),
            end.format(LABEL_FORMAT)
        )
    }

    /// Date range label for the current local day.
    pub fn date_range_label(&self) -> String {
        self.date_range_label_at(today())
    }
}

/// Today's date on the local clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn month_bounds(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let start = ymd(year, month, 1);
    let next = if month == 12 {
        ymd(year + 1, 1, 1)
    } else {
        ymd(year, month + 1, 1)
    };
    (start, next - Duration::days(1))
}

impl From<&str> for Interval {
    fn from(raw: &str) -> Self {
        match raw {
            "daily" => Interval::Daily,
            "weekly" => Interval::Weekly,
            "monthly" => Interval::Monthly,
            "quarterly" => Interval::Quarterly,
            "yearly" => Interval::Yearly,
            other => Interval::Other(other.to_string()),
        }
    }
}

impl From<String> for Interval {
    fn from(raw: String) -> Self {
        Interval::from(raw.as_str())
    }
}

impl From<Interval> for String {
    fn from(interval: Interval) -> Self {
        interval.as_str().to_string()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
