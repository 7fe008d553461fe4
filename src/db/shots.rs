//! Shot task aggregates per episode.

use super::{
    person_name_sql, Database, OMIT_TASK_STATUS, OPEN_PROJECT_STATUS, PLACEHOLDER_SHOT,
    SHOT_ENTITY_TYPE,
};
use crate::types::ShotSummaryRow;
use anyhow::Result;
use rusqlite::{params, Row};
use tracing::debug;

impl Database {
    /// Shot tasks in open projects, aggregated per
    /// (project, department, episode, task type, status).
    ///
    /// Shots are walked up through their scene to the episode. The
    /// placeholder shot `sh000` contributes neither frames nor a shot count.
    /// Shared by the shot data, project details, shot details and project
    /// navigation pages.
    pub fn shot_summary(&self) -> Result<Vec<ShotSummaryRow>> {
        let sql = format!(
            "SELECT
                project.name AS project,
                project.code AS project_code,
                department.name AS department,
                episode.name AS episode,
                task_type.name AS task_type,
                task_type.short_name AS task_type_code,
                task_type.priority AS priority,
                task_type.color AS task_type_color,
                task_status.name AS task_status,
                task_status.short_name AS task_status_code,
                task_status.color AS task_status_color,
                SUM(task.estimation) AS task_estimation,
                SUM(task.duration) AS task_duration,
                SUM(task.retake_count) AS retake_count,
                MIN(task.real_start_date) AS task_real_start_date,
                MAX(task.end_date) AS task_end_date,
                MIN(task.start_date) AS task_start_date,
                MAX(task.due_date) AS task_due_date,
                SUM(CASE WHEN shot.name = ?3 THEN 0 ELSE COALESCE(shot.nb_frames, 0) END)
                    AS nb_frames,
                COUNT(DISTINCT CASE WHEN shot.name = ?3 THEN NULL ELSE shot.id END)
                    AS shot_count,
                (SELECT group_concat({artist}, ', ')
                   FROM person p
                  WHERE EXISTS (
                        SELECT 1
                          FROM task t
                          JOIN entity s ON t.entity_id = s.id
                          JOIN entity sc ON s.parent_id = sc.id
                          JOIN assignations a ON a.task = t.id
                         WHERE a.person = p.id
                           AND sc.parent_id = episode.id
                           AND t.task_type_id = task_type.id
                           AND t.task_status_id = task_status.id
                           AND COALESCE(s.canceled, 0) = 0)) AS artists
            FROM entity shot
            JOIN entity scene ON shot.parent_id = scene.id
            JOIN entity episode ON scene.parent_id = episode.id
            JOIN task ON task.entity_id = shot.id
            JOIN project ON task.project_id = project.id
            JOIN project_status ON project.project_status_id = project_status.id
            JOIN entity_type ON shot.entity_type_id = entity_type.id
            JOIN task_status ON task.task_status_id = task_status.id
            JOIN task_type ON task.task_type_id = task_type.id
            LEFT JOIN department ON task_type.department_id = department.id
            WHERE project_status.name = ?1
              AND COALESCE(shot.canceled, 0) = 0
              AND task_status.name <> ?2
              AND entity_type.name = ?4
            GROUP BY project.id, department.id, episode.id, task_type.id, task_status.id
            ORDER BY project_code, department, episode, priority, task_status",
            artist = person_name_sql("p"),
        );

        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(
                    params![
                        OPEN_PROJECT_STATUS,
                        OMIT_TASK_STATUS,
                        PLACEHOLDER_SHOT,
                        SHOT_ENTITY_TYPE
                    ],
                    Self::map_shot_summary,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;

        debug!(rows = rows.len(), "Loaded shot summary");
        Ok(rows)
    }

    fn map_shot_summary(row: &Row<'_>) -> rusqlite::Result<ShotSummaryRow> {
        Ok(ShotSummaryRow {
            project: row.get("project")?,
            project_code: row.get("project_code")?,
            department: row.get("department")?,
            episode: row.get("episode")?,
            task_type: row.get("task_type")?,
            task_type_code: row.get("task_type_code")?,
            priority: row.get("priority")?,
            task_type_color: row.get("task_type_color")?,
            task_status: row.get("task_status")?,
            task_status_code: row.get("task_status_code")?,
            task_status_color: row.get("task_status_color")?,
            task_estimation: row.get("task_estimation")?,
            task_duration: row.get("task_duration")?,
            retake_count: row.get("retake_count")?,
            task_real_start_date: row.get("task_real_start_date")?,
            task_end_date: row.get("task_end_date")?,
            task_start_date: row.get("task_start_date")?,
            task_due_date: row.get("task_due_date")?,
            nb_frames: row.get("nb_frames")?,
            shot_count: row.get("shot_count")?,
            artists: row.get("artists")?,
        })
    }
}
