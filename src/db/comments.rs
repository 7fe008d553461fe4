//! Comment history on shot tasks.

use super::{Database, OPEN_PROJECT_STATUS, SHOT_ENTITY_TYPE};
use crate::types::TaskCommentRow;
use anyhow::Result;
use rusqlite::{params, Row};
use tracing::debug;

impl Database {
    /// Every comment posted on an assigned shot task in an open project,
    /// newest first within each shot.
    ///
    /// `task_end_date` carries the task's due date.
    pub fn task_comments(&self) -> Result<Vec<TaskCommentRow>> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT
                    project.name AS project,
                    department.name AS department,
                    episode.name AS episode,
                    scene.name AS scene,
                    shot.name AS shot,
                    task_type.name AS task_type,
                    task_type.priority AS task_priority,
                    task_status.name AS task_status,
                    task.start_date AS task_start_date,
                    task.due_date AS task_end_date,
                    comment.text AS comment_text,
                    comment.checklist AS comment_checklist,
                    preview_file.id AS preview_file_id,
                    task_type.color AS task_type_color,
                    task_status.color AS task_status_color,
                    task.last_comment_date AS last_comment_date,
                    comment.created_at AS comment_created_at
                 FROM entity shot
                 JOIN entity scene ON shot.parent_id = scene.id
                 JOIN entity episode ON scene.parent_id = episode.id
                 JOIN entity_type ON shot.entity_type_id = entity_type.id
                 JOIN task ON task.entity_id = shot.id
                 JOIN project ON task.project_id = project.id
                 JOIN project_status ON project.project_status_id = project_status.id
                 JOIN task_status ON task.task_status_id = task_status.id
                 JOIN task_type ON task.task_type_id = task_type.id
                 LEFT JOIN department ON task_type.department_id = department.id
                 JOIN comment ON comment.object_id = task.id
                 LEFT JOIN comment_preview_link ON comment_preview_link.comment = comment.id
                 LEFT JOIN preview_file ON comment_preview_link.preview_file = preview_file.id
                 WHERE project_status.name = ?1
                   AND entity_type.name = ?2
                   AND EXISTS (SELECT 1 FROM assignations WHERE assignations.task = task.id)
                 ORDER BY project, episode, scene, shot, task_priority, comment_created_at DESC",
            )?;
            let rows = stmt
                .query_map(
                    params![OPEN_PROJECT_STATUS, SHOT_ENTITY_TYPE],
                    Self::map_task_comment,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })?;

        debug!(rows = rows.len(), "Loaded task comments");
        Ok(rows)
    }

    fn map_task_comment(row: &Row<'_>) -> rusqlite::Result<TaskCommentRow> {
        Ok(TaskCommentRow {
            project: row.get("project")?,
            department: row.get("department")?,
            episode: row.get("episode")?,
            scene: row.get("scene")?,
            shot: row.get("shot")?,
            task_type: row.get("task_type")?,
            task_priority: row.get("task_priority")?,
            task_status: row.get("task_status")?,
            task_start_date: row.get("task_start_date")?,
            task_end_date: row.get("task_end_date")?,
            comment_text: row.get("comment_text")?,
            comment_checklist: row.get("comment_checklist")?,
            preview_file_id: row.get("preview_file_id")?,
            task_type_color: row.get("task_type_color")?,
            task_status_color: row.get("task_status_color")?,
            last_comment_date: row.get("last_comment_date")?,
        })
    }
}
