//! Row-wise derivations: normalized dates, durations, status labels and colors.
//!
//! All functions here are pure. Missing or malformed dates never raise: they
//! display as an empty string or the `"NaNa"` sentinel and compare as false.

use crate::types::TaskFields;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// Status name of tasks nobody has picked up yet.
pub const TODO_STATUS: &str = "Todo";

/// Display value for a date that is present but cannot be parsed.
pub const INVALID_DATE: &str = "NaNa";

/// Working minutes in one production day (8 hours).
const MINUTES_PER_DAY: f64 = 60.0 * 8.0;

/// Human-readable scheduling state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusDescription {
    StartedNoStartDate,
    StartedOnTime,
    StartedLate,
    NotStartedOverdue,
    StartedNotScheduled,
    NoInfo,
}

impl StatusDescription {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusDescription::StartedNoStartDate => "Started | No Start Date",
            StatusDescription::StartedOnTime => "Started | On Time | Scheduled",
            StatusDescription::StartedLate => "Started | LATE | Scheduled",
            StatusDescription::NotStartedOverdue => "Not Started | Overdue | Scheduled",
            StatusDescription::StartedNotScheduled => "Started | Not Scheduled",
            StatusDescription::NoInfo => "No Info",
        }
    }

    /// Display color of this label.
    pub fn color(&self) -> StatusColor {
        status_color(self.as_str())
    }

    /// Every label, in decision order.
    pub fn all() -> [StatusDescription; 6] {
        [
            StatusDescription::StartedNoStartDate,
            StatusDescription::StartedOnTime,
            StatusDescription::StartedLate,
            StatusDescription::NotStartedOverdue,
            StatusDescription::StartedNotScheduled,
            StatusDescription::NoInfo,
        ]
    }
}

impl fmt::Display for StatusDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatusDescription {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Display color for a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Red,
    Green,
    Yellow,
    Grey,
}

impl StatusColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusColor::Red => "red",
            StatusColor::Green => "green",
            StatusColor::Yellow => "yellow",
            StatusColor::Grey => "grey",
        }
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a database date value.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS[.f]`, `YYYY-MM-DDTHH:MM:SS[.f]`
/// and RFC 3339. Date-only values land on midnight. Values with an offset
/// are converted to UTC so they compare as instants.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse an optional date, treating NULL and blank as absent.
pub fn parse_opt_date(raw: Option<&str>) -> Option<NaiveDateTime> {
    raw.and_then(parse_date)
}

/// `true` when the value is NULL or blank.
pub fn is_blank(raw: Option<&str>) -> bool {
    raw.is_none_or(|s| s.trim().is_empty())
}

/// Normalize a date for display as `YYYY-MM-DD`.
///
/// Absent values become the empty string; unparseable values become
/// [`INVALID_DATE`]. Values with an offset keep their own calendar date.
pub fn normalize_date(raw: Option<&str>) -> String {
    if is_blank(raw) {
        return String::new();
    }
    if let Some(dt) = raw.and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok()) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    match parse_opt_date(raw) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

/// Compare two optional dates. `None` when either side is missing or invalid.
pub fn compare_dates(a: Option<&str>, b: Option<&str>) -> Option<Ordering> {
    Some(parse_opt_date(a)?.cmp(&parse_opt_date(b)?))
}

/// Whole days from `start` to `end`, when both parse.
pub fn duration_days(start: Option<&str>, end: Option<&str>) -> Option<i64> {
    let start = parse_opt_date(start)?;
    let end = parse_opt_date(end)?;
    Some((end - start).num_days())
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert an effort in minutes to 8-hour working days.
pub fn estimate_days(minutes: f64) -> f64 {
    round2(minutes / MINUTES_PER_DAY)
}

/// Percentage of `part` over `total`, rounded to two decimals. Zero when
/// `total` is zero.
pub fn percent(part: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(part as f64 / total as f64 * 100.0)
}

/// Derive the scheduling label of a task.
///
/// Decision order, first match wins:
/// 1. active with no real start date
/// 2. active, started no later than planned, due no earlier than end
/// 3. active, started after planned, due no earlier than end
/// 4. active, started no later than planned, due before end
/// 5. any other active task
/// 6. `Todo` tasks
///
/// A comparison with a missing or invalid date is false.
pub fn status_description<T: TaskFields + ?Sized>(row: &T) -> StatusDescription {
    if row.task_status() == TODO_STATUS {
        return StatusDescription::NoInfo;
    }

    if is_blank(row.task_real_start_date()) {
        return StatusDescription::StartedNoStartDate;
    }

    let start = compare_dates(row.task_real_start_date(), row.task_start_date());
    let due = compare_dates(row.task_due_date(), row.task_end_date());

    let on_schedule = matches!(start, Some(Ordering::Less | Ordering::Equal));
    let late = matches!(start, Some(Ordering::Greater));
    let due_after_end = matches!(due, Some(Ordering::Greater | Ordering::Equal));
    let overdue = matches!(due, Some(Ordering::Less));

    if on_schedule && due_after_end {
        StatusDescription::StartedOnTime
    } else if late && due_after_end {
        StatusDescription::StartedLate
    } else if on_schedule && overdue {
        StatusDescription::NotStartedOverdue
    } else {
        StatusDescription::StartedNotScheduled
    }
}

/// Map a status label to its color by case-insensitive substring match.
pub fn status_color(label: &str) -> StatusColor {
    let label = label.to_lowercase();
    if label.contains("late") {
        StatusColor::Red
    } else if label.contains("on time") {
        StatusColor::Green
    } else if label.contains("overdue") {
        StatusColor::Red
    } else if label.contains("not scheduled") {
        StatusColor::Yellow
    } else {
        StatusColor::Grey
    }
}

/// Columns derived from a task row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskCalcs {
    pub calc_task_start_date: String,
    pub calc_task_due_date: String,
    pub calc_task_real_start_date: String,
    pub calc_task_end_date: String,
    /// Planned length: end date minus start date.
    pub duration_days: Option<i64>,
    pub calc_estimate: Option<f64>,
    pub calc_duration: Option<f64>,
    pub status_description: StatusDescription,
    pub calc_status_color: StatusColor,
}

impl TaskCalcs {
    pub fn derive<T: TaskFields + ?Sized>(row: &T) -> Self {
        let status_description = status_description(row);
        Self {
            calc_task_start_date: normalize_date(row.task_start_date()),
            calc_task_due_date: normalize_date(row.task_due_date()),
            calc_task_real_start_date: normalize_date(row.task_real_start_date()),
            calc_task_end_date: normalize_date(row.task_end_date()),
            duration_days: duration_days(row.task_start_date(), row.task_end_date()),
            calc_estimate: row.task_estimation().map(estimate_days),
            calc_duration: row.task_duration().map(estimate_days),
            status_description,
            calc_status_color: status_description.color(),
        }
    }
}
