//! Asset task aggregates.

use super::{person_name_sql, Database, ASSET_ENTITY, OMIT_TASK_STATUS, OPEN_PROJECT_STATUS};
use crate::types::AssetTaskRow;
use anyhow::Result;
use rusqlite::{params, Row};
use tracing::debug;

impl Database {
    /// Tasks on assets in open projects, aggregated per
    /// (project, department, entity type, asset, task type, status).
    ///
    /// Effort and retakes are summed, start dates take the earliest value and
    /// end dates the latest. `artists` lists everyone assigned to the group's
    /// tasks, comma separated.
    pub fn asset_tasks(&self) -> Result<Vec<AssetTaskRow>> {
        let sql = format!(
            "SELECT
                project.name AS project,
                department.name AS department,
                entity_type.name AS entity_type,
                asset.name AS asset_name,
                task_type.name AS task_type,
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
                (SELECT group_concat({artist}, ', ')
                   FROM person p
                  WHERE EXISTS (
                        SELECT 1
                          FROM task t
                          JOIN assignations a ON a.task = t.id
                         WHERE a.person = p.id
                           AND t.entity_id = asset.id
                           AND t.task_type_id = task_type.id
                           AND t.task_status_id = task_status.id)) AS artists
            FROM entity asset
            JOIN task ON task.entity_id = asset.id
            JOIN project ON task.project_id = project.id
            JOIN project_status ON project.project_status_id = project_status.id
            JOIN entity_type ON asset.entity_type_id = entity_type.id
            JOIN task_status ON task.task_status_id = task_status.id
            JOIN task_type ON task.task_type_id = task_type.id
            LEFT JOIN department ON task_type.department_id = department.id
            WHERE project_status.name = ?1
              AND COALESCE(asset.canceled, 0) = 0
              AND task_status.name <> ?2
              AND task_type.for_entity = ?3
            GROUP BY project.id, department.id, entity_type.id, asset.id,
                     task_type.id, task_status.id
            ORDER BY project, entity_type, asset_name, priority",
            artist = person_name_sql("p"),
        );

        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(
                    params![OPEN_PROJECT_STATUS, OMIT_TASK_STATUS, ASSET_ENTITY],
                    Self::map_asset_task,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;

        debug!(rows = rows.len(), "Loaded asset tasks");
        Ok(rows)
    }

    fn map_asset_task(row: &Row<'_>) -> rusqlite::Result<AssetTaskRow> {
        Ok(AssetTaskRow {
            project: row.get("project")?,
            department: row.get("department")?,
            entity_type: row.get("entity_type")?,
            asset_name: row.get("asset_name")?,
            task_type: row.get("task_type")?,
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
            artists: row.get("artists")?,
        })
    }
}
