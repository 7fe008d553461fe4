//! Row types returned by the reporting queries.
//!
//! Every page query produces one of these row shapes. Rows carrying task
//! dates implement [`TaskFields`] so the derivation and date-window layers can
//! work over any of them; rows that take part in dropdown filtering implement
//! [`Selectable`].

use crate::calcs::TaskCalcs;
use serde::Serialize;

/// Raw task attributes consumed by the derivation layer.
///
/// Dates are passed through exactly as the database returned them: ISO date
/// or datetime strings, or `None` when the column was NULL.
pub trait TaskFields {
    fn task_status(&self) -> &str;
    fn task_start_date(&self) -> Option<&str>;
    fn task_due_date(&self) -> Option<&str>;
    fn task_real_start_date(&self) -> Option<&str>;
    fn task_end_date(&self) -> Option<&str>;

    /// Estimated effort in minutes.
    fn task_estimation(&self) -> Option<f64> {
        None
    }

    /// Logged effort in minutes.
    fn task_duration(&self) -> Option<f64> {
        None
    }
}

/// Access to the string columns dropdown filters select on.
pub trait Selectable {
    /// Value of the named column, or `None` when the row has no such column
    /// or the column is NULL.
    fn field(&self, name: &str) -> Option<&str>;
}

/// One task assignment on the artist page: a single (entity, task, assignee).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArtistTaskRow {
    pub project: String,
    pub project_code: Option<String>,
    pub department: Option<String>,
    pub artist: String,
    pub episode: String,
    pub for_entity: Option<String>,
    pub task: String,
    pub entity_type: String,
    pub task_type: String,
    pub task_type_color: Option<String>,
    pub task_type_code: Option<String>,
    pub task_status: String,
    pub task_status_color: Option<String>,
    pub task_status_code: Option<String>,
    pub task_start_date: Option<String>,
    pub task_due_date: Option<String>,
    pub task_real_start_date: Option<String>,
    pub task_end_date: Option<String>,
    pub task_estimation: Option<f64>,
    pub task_duration: Option<f64>,
    pub retake_count: Option<i64>,
    pub priority: Option<i64>,
    pub working_file_name: Option<String>,
    pub working_file_published_at: Option<String>,
    pub output_file_name: Option<String>,
    pub output_file_published_at: Option<String>,
}

/// Aggregated tasks of one asset for one task type and status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetTaskRow {
    pub project: String,
    pub department: Option<String>,
    pub entity_type: String,
    pub asset_name: String,
    pub task_type: String,
    pub priority: Option<i64>,
    pub task_type_color: Option<String>,
    pub task_status: String,
    pub task_status_code: Option<String>,
    pub task_status_color: Option<String>,
    pub task_estimation: Option<f64>,
    pub task_duration: Option<f64>,
    pub retake_count: Option<i64>,
    pub task_real_start_date: Option<String>,
    pub task_end_date: Option<String>,
    pub task_start_date: Option<String>,
    pub task_due_date: Option<String>,
    pub artists: Option<String>,
}

/// Shot tasks aggregated per episode, department, task type and status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShotSummaryRow {
    pub project: String,
    pub project_code: Option<String>,
    pub department: Option<String>,
    pub episode: String,
    pub task_type: String,
    pub task_type_code: Option<String>,
    pub priority: Option<i64>,
    pub task_type_color: Option<String>,
    pub task_status: String,
    pub task_status_code: Option<String>,
    pub task_status_color: Option<String>,
    pub task_estimation: Option<f64>,
    pub task_duration: Option<f64>,
    pub retake_count: Option<i64>,
    pub task_real_start_date: Option<String>,
    pub task_end_date: Option<String>,
    pub task_start_date: Option<String>,
    pub task_due_date: Option<String>,
    pub nb_frames: Option<i64>,
    pub shot_count: i64,
    pub artists: Option<String>,
}

/// Project-level progress for the summary page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectSummaryRow {
    pub id: String,
    pub name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub perc_completed: f64,
    pub duration: Option<i64>,
    pub project_status: Option<String>,
}

/// A single comment posted on a shot task.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskCommentRow {
    pub project: String,
    pub department: Option<String>,
    pub episode: String,
    pub scene: String,
    pub shot: String,
    pub task_type: String,
    pub task_priority: Option<i64>,
    pub task_status: String,
    pub task_start_date: Option<String>,
    /// The task's due date; comment history plots tasks up to their due date.
    pub task_end_date: Option<String>,
    pub comment_text: Option<String>,
    pub comment_checklist: Option<String>,
    pub preview_file_id: Option<String>,
    pub task_type_color: Option<String>,
    pub task_status_color: Option<String>,
    pub last_comment_date: Option<String>,
}

/// A query row together with its derived columns.
///
/// Serializes flat, so table columns address raw and derived fields alike.
#[derive(Debug, Clone, Serialize)]
pub struct Derived<R> {
    #[serde(flatten)]
    pub row: R,
    #[serde(flatten)]
    pub calcs: TaskCalcs,
}

impl<R: TaskFields> Derived<R> {
    /// Compute the derived columns of `row`.
    pub fn new(row: R) -> Self {
        let calcs = TaskCalcs::derive(&row);
        Self { row, calcs }
    }
}

/// Attach derived columns to every row.
pub fn derive_all<R: TaskFields>(rows: Vec<R>) -> Vec<Derived<R>> {
    rows.into_iter().map(Derived::new).collect()
}

impl<R: TaskFields> TaskFields for Derived<R> {
    fn task_status(&self) -> &str {
        self.row.task_status()
    }
    fn task_start_date(&self) -> Option<&str> {
        self.row.task_start_date()
    }
    fn task_due_date(&self) -> Option<&str> {
        self.row.task_due_date()
    }
    fn task_real_start_date(&self) -> Option<&str> {
        self.row.task_real_start_date()
    }
    fn task_end_date(&self) -> Option<&str> {
        self.row.task_end_date()
    }
    fn task_estimation(&self) -> Option<f64> {
        self.row.task_estimation()
    }
    fn task_duration(&self) -> Option<f64> {
        self.row.task_duration()
    }
}

impl<R: Selectable> Selectable for Derived<R> {
    fn field(&self, name: &str) -> Option<&str> {
        self.row.field(name)
    }
}

impl TaskFields for ArtistTaskRow {
    fn task_status(&self) -> &str {
        &self.task_status
    }
    fn task_start_date(&self) -> Option<&str> {
        self.task_start_date.as_deref()
    }
    fn task_due_date(&self) -> Option<&str> {
        self.task_due_date.as_deref()
    }
    fn task_real_start_date(&self) -> Option<&str> {
        self.task_real_start_date.as_deref()
    }
    fn task_end_date(&self) -> Option<&str> {
        self.task_end_date.as_deref()
    }
    fn task_estimation(&self) -> Option<f64> {
        self.task_estimation
    }
    fn task_duration(&self) -> Option<f64> {
        self.task_duration
    }
}

impl Selectable for ArtistTaskRow {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "project" => Some(&self.project),
            "department" => self.department.as_deref(),
            "artist" => Some(&self.artist),
            "episode" => Some(&self.episode),
            "task_type" => Some(&self.task_type),
            "task_status" => Some(&self.task_status),
            _ => None,
        }
    }
}

impl TaskFields for AssetTaskRow {
    fn task_status(&self) -> &str {
        &self.task_status
    }
    fn task_start_date(&self) -> Option<&str> {
        self.task_start_date.as_deref()
    }
    fn task_due_date(&self) -> Option<&str> {
        self.task_due_date.as_deref()
    }
    fn task_real_start_date(&self) -> Option<&str> {
        self.task_real_start_date.as_deref()
    }
    fn task_end_date(&self) -> Option<&str> {
        self.task_end_date.as_deref()
    }
    fn task_estimation(&self) -> Option<f64> {
        self.task_estimation
    }
    fn task_duration(&self) -> Option<f64> {
        self.task_duration
    }
}

impl Selectable for AssetTaskRow {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "project" => Some(&self.project),
            "department" => self.department.as_deref(),
            "task_type" => Some(&self.task_type),
            "task_status" => Some(&self.task_status),
            _ => None,
        }
    }
}

impl TaskFields for ShotSummaryRow {
    fn task_status(&self) -> &str {
        &self.task_status
    }
    fn task_start_date(&self) -> Option<&str> {
        self.task_start_date.as_deref()
    }
    fn task_due_date(&self) -> Option<&str> {
        self.task_due_date.as_deref()
    }
    fn task_real_start_date(&self) -> Option<&str> {
        self.task_real_start_date.as_deref()
    }
    fn task_end_date(&self) -> Option<&str> {
        self.task_end_date.as_deref()
    }
    fn task_estimation(&self) -> Option<f64> {
        self.task_estimation
    }
    fn task_duration(&self) -> Option<f64> {
        self.task_duration
    }
}

impl Selectable for ShotSummaryRow {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "project" => Some(&self.project),
            "department" => self.department.as_deref(),
            "episode" => Some(&self.episode),
            "task_type" => Some(&self.task_type),
            "task_status" => Some(&self.task_status),
            _ => None,
        }
    }
}

impl Selectable for TaskCommentRow {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "project" => Some(&self.project),
            "department" => self.department.as_deref(),
            "episode" => Some(&self.episode),
            "task_type" => Some(&self.task_type),
            "task_status" => Some(&self.task_status),
            _ => None,
        }
    }
}

impl Selectable for ProjectSummaryRow {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "project" => Some(&self.name),
            "project_status" => self.project_status.as_deref(),
            _ => None,
        }
    }
}
