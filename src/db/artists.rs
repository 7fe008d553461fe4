//! Task assignments per artist.

use super::{person_name_sql, Database, OMIT_TASK_STATUS, OPEN_PROJECT_STATUS};
use crate::types::ArtistTaskRow;
use anyhow::Result;
use rusqlite::{params, Row};
use tracing::debug;

impl Database {
    /// One row per (entity, task, assignee) in open projects.
    ///
    /// Canceled entities and omitted tasks are left out. Each row carries the
    /// assignee's most recent working file on the task and most recent output
    /// file on the entity for that task type.
    pub fn artist_tasks(&self) -> Result<Vec<ArtistTaskRow>> {
        let sql = format!(
            "WITH last_working_file AS (
                SELECT task_id, person_id, name, updated_at,
                       ROW_NUMBER() OVER (
                           PARTITION BY task_id, person_id ORDER BY updated_at DESC
                       ) AS rn
                FROM working_file
            ),
            last_output_file AS (
                SELECT entity_id, person_id, task_type_id, name, updated_at,
                       ROW_NUMBER() OVER (
                           PARTITION BY entity_id, person_id, task_type_id ORDER BY updated_at DESC
                       ) AS rn
                FROM output_file
            )
            SELECT DISTINCT
                project.name AS project,
                project.code AS project_code,
                department.name AS department,
                {artist} AS artist,
                CASE WHEN parent.name IS NOT NULL AND grandparent.name IS NOT NULL
                     THEN grandparent.name ELSE 'ALL' END AS episode,
                task_type.for_entity AS for_entity,
                CASE WHEN parent.name IS NOT NULL AND grandparent.name IS NOT NULL
                     THEN grandparent.name || '_' || parent.name || '_' || entity.name
                     ELSE entity.name END AS task,
                entity_type.name AS entity_type,
                task_type.name AS task_type,
                task_type.color AS task_type_color,
                task_type.short_name AS task_type_code,
                task_status.name AS task_status,
                task_status.color AS task_status_color,
                task_status.short_name AS task_status_code,
                task.start_date AS task_start_date,
                task.due_date AS task_due_date,
                task.real_start_date AS task_real_start_date,
                task.end_date AS task_end_date,
                task.estimation AS task_estimation,
                task.duration AS task_duration,
                task.retake_count AS retake_count,
                task_type.priority AS priority,
                wf.name AS working_file_name,
                wf.updated_at AS working_file_published_at,
                outf.name AS output_file_name,
                outf.updated_at AS output_file_published_at
            FROM entity
            LEFT JOIN entity parent ON entity.parent_id = parent.id
            LEFT JOIN entity grandparent ON parent.parent_id = grandparent.id
            JOIN task ON task.entity_id = entity.id
            JOIN project ON task.project_id = project.id
            JOIN project_status ON project.project_status_id = project_status.id
            JOIN entity_type ON entity.entity_type_id = entity_type.id
            JOIN task_status ON task.task_status_id = task_status.id
            JOIN task_type ON task.task_type_id = task_type.id
            LEFT JOIN department ON task_type.department_id = department.id
            JOIN assignations ON assignations.task = task.id
            JOIN person ON person.id = assignations.person
            LEFT JOIN last_working_file wf
                ON wf.task_id = task.id AND wf.person_id = person.id AND wf.rn = 1
            LEFT JOIN last_output_file outf
                ON outf.entity_id = entity.id AND outf.person_id = person.id
               AND outf.task_type_id = task_type.id AND outf.rn = 1
            WHERE project_status.name = ?1
              AND COALESCE(entity.canceled, 0) = 0
              AND task_status.name <> ?2
            ORDER BY artist, priority, task, task_type",
            artist = person_name_sql("person"),
        );

        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(
                    params![OPEN_PROJECT_STATUS, OMIT_TASK_STATUS],
                    Self::map_artist_task,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;

        debug!(rows = rows.len(), "Loaded artist tasks");
        Ok(rows)
    }

    fn map_artist_task(row: &Row<'_>) -> rusqlite::Result<ArtistTaskRow> {
        Ok(ArtistTaskRow {
            project: row.get("project")?,
            project_code: row.get("project_code")?,
            department: row.get("department")?,
            artist: row.get("artist")?,
            episode: row.get("episode")?,
            for_entity: row.get("for_entity")?,
            task: row.get("task")?,
            entity_type: row.get("entity_type")?,
            task_type: row.get("task_type")?,
            task_type_color: row.get("task_type_color")?,
            task_type_code: row.get("task_type_code")?,
            task_status: row.get("task_status")?,
            task_status_color: row.get("task_status_color")?,
            task_status_code: row.get("task_status_code")?,
            task_start_date: row.get("task_start_date")?,
            task_due_date: row.get("task_due_date")?,
            task_real_start_date: row.get("task_real_start_date")?,
            task_end_date: row.get("task_end_date")?,
            task_estimation: row.get("task_estimation")?,
            task_duration: row.get("task_duration")?,
            retake_count: row.get("retake_count")?,
            priority: row.get("priority")?,
            working_file_name: row.get("working_file_name")?,
            working_file_published_at: row.get("working_file_published_at")?,
            output_file_name: row.get("output_file_name")?,
            output_file_published_at: row.get("output_file_published_at")?,
        })
    }
}
