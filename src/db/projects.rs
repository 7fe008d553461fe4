//! Project progress.

use super::Database;
use crate::calcs::{duration_days, percent};
use crate::types::ProjectSummaryRow;
use anyhow::Result;
use rusqlite::Row;
use tracing::debug;

impl Database {
    /// Every project with its task totals, completion percentage and length
    /// in days.
    ///
    /// A task counts as completed when its status is flagged `is_done`.
    pub fn project_summary(&self) -> Result<Vec<ProjectSummaryRow>> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT
                    project.id AS id,
                    project.name AS name,
                    project.start_date AS start_date,
                    project.end_date AS end_date,
                    (SELECT COUNT(*) FROM task WHERE task.project_id = project.id)
                        AS total_tasks,
                    (SELECT COUNT(*) FROM task
                       JOIN task_status ON task.task_status_id = task_status.id
                      WHERE task.project_id = project.id
                        AND COALESCE(task_status.is_done, 0) <> 0) AS completed_tasks,
                    project_status.name AS project_status
                 FROM project
                 LEFT JOIN project_status ON project.project_status_id = project_status.id
                 ORDER BY project.name",
            )?;
            let rows = stmt
                .query_map([], Self::map_project_summary)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;

        debug!(rows = rows.len(), "Loaded project summary");
        Ok(rows)
    }

    fn map_project_summary(row: &Row<'_>) -> rusqlite::Result<ProjectSummaryRow> {
        let start_date: Option<String> = row.get("start_date")?;
        let end_date: Option<String> = row.get("end_date")?;
        let total_tasks: i64 = row.get("total_tasks")?;
        let completed_tasks: i64 = row.get("completed_tasks")?;

        Ok(ProjectSummaryRow {
            id: row.get("id")?,
            name: row.get("name")?,
            duration: duration_days(start_date.as_deref(), end_date.as_deref()),
            perc_completed: percent(completed_tasks, total_tasks),
            start_date,
            end_date,
            total_tasks,
            completed_tasks,
            project_status: row.get("project_status")?,
        })
    }
}
