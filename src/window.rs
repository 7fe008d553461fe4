//! Date-window filter: buckets tasks into last week / now / next week around
//! the current time.

use crate::calcs::parse_opt_date;
use crate::types::TaskFields;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default span of a window, in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 14;

/// Window selected by one of the task date buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DateWindow {
    #[value(name = "last_week")]
    LastWeek,
    Now,
    #[value(name = "next_week")]
    NextWeek,
    #[default]
    Reset,
}

impl DateWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateWindow::LastWeek => "last_week",
            DateWindow::Now => "now",
            DateWindow::NextWeek => "next_week",
            DateWindow::Reset => "reset",
        }
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            DateWindow::LastWeek => "Last Week",
            DateWindow::Now => "Now",
            DateWindow::NextWeek => "Next Week",
            DateWindow::Reset => "Reset",
        }
    }

    pub fn all() -> [DateWindow; 4] {
        [
            DateWindow::LastWeek,
            DateWindow::Now,
            DateWindow::NextWeek,
            DateWindow::Reset,
        ]
    }

    /// Resolve the window from the id of the button that triggered the
    /// refresh, e.g. `artist_data_tasks_last_week` or just `last_week`.
    ///
    /// Anything unrecognised, including no trigger at all, is [`DateWindow::Reset`].
    pub fn from_trigger(trigger: Option<&str>) -> Self {
        let Some(trigger) = trigger.map(str::trim).filter(|t| !t.is_empty()) else {
            return DateWindow::Reset;
        };
        for window in [DateWindow::LastWeek, DateWindow::NextWeek, DateWindow::Now] {
            let name = window.as_str();
            if trigger == name || trigger.ends_with(&format!("tasks_{}", name)) {
                return window;
            }
        }
        DateWindow::Reset
    }

    /// Whether a row falls inside this window.
    ///
    /// A missing or unparseable date never satisfies a comparison. A span
    /// reaching past the representable dates keeps every row, like
    /// [`DateWindow::Reset`].
    pub fn contains<T: TaskFields + ?Sized>(&self, row: &T, now: NaiveDateTime, days: i64) -> bool {
        if *self == DateWindow::Reset {
            return true;
        }
        let Some((cutoff, horizon)) = span_bounds(now, days) else {
            return true;
        };
        let due = parse_opt_date(row.task_due_date());
        let start = parse_opt_date(row.task_start_date());

        match self {
            // OR is kept as found on the artist and shot pages; an AND variant
            // exists elsewhere and the intended semantics are unresolved.
            DateWindow::LastWeek => {
                due.is_some_and(|d| d <= cutoff) || start.is_some_and(|s| s >= cutoff)
            }
            DateWindow::Now => due.is_some_and(|d| d >= now && d <= horizon),
            DateWindow::NextWeek => due.is_some_and(|d| d <= horizon),
            DateWindow::Reset => true,
        }
    }
}

/// `now - days` and `now + days`, or `None` when either overflows.
fn span_bounds(now: NaiveDateTime, days: i64) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let span = Duration::try_days(days)?;
    Some((now.checked_sub_signed(span)?, now.checked_add_signed(span)?))
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keep the rows inside `window`. [`DateWindow::Reset`] returns the input
/// unchanged.
pub fn filter_by_task_date<T: TaskFields>(
    rows: Vec<T>,
    window: DateWindow,
    now: NaiveDateTime,
    days: i64,
) -> Vec<T> {
    if window == DateWindow::Reset {
        return rows;
    }
    if span_bounds(now, days).is_none() {
        tracing::warn!(window = %window, days, "Window span out of range, keeping all rows");
        return rows;
    }
    let before = rows.len();
    let kept: Vec<T> = rows
        .into_iter()
        .filter(|row| window.contains(row, now, days))
        .collect();
    tracing::debug!(window = %window, before, after = kept.len(), "Applied task date window");
    kept
}
