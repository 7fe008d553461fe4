//! Read-only access to the production-tracking reporting database.
//!
//! Every operation opens its own connection through [`Database::with_conn`]
//! and closes it before returning, so no page holds a connection between
//! requests.

pub mod artists;
pub mod assets;
pub mod comments;
pub mod projects;
pub mod shots;

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, trace, warn};

/// Project status of productions shown on the task pages.
pub const OPEN_PROJECT_STATUS: &str = "Open";

/// Task status hidden from every report.
pub const OMIT_TASK_STATUS: &str = "Omit";

/// Placeholder shot excluded from frame and shot counts.
pub const PLACEHOLDER_SHOT: &str = "sh000";

/// Entity type name of shots.
pub const SHOT_ENTITY_TYPE: &str = "Shot";

/// `task_type.for_entity` value of asset task types.
pub const ASSET_ENTITY: &str = "Asset";

/// SQL for "first last" with the space only when both parts are present.
pub(crate) fn person_name_sql(alias: &str) -> String {
    format!(
        "COALESCE({a}.first_name, '') || \
         CASE WHEN {a}.first_name IS NOT NULL AND {a}.last_name IS NOT NULL THEN ' ' ELSE '' END || \
         COALESCE({a}.last_name, '')",
        a = alias
    )
}

/// Handle on the reporting database.
///
/// Cheap to clone: it holds the location and connection settings, not a
/// connection.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    busy_timeout: Duration,
}

/// Result of a connectivity check.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseInfo {
    pub path: PathBuf,
    pub sqlite_version: String,
    pub table_count: i64,
    pub project_count: i64,
    pub open_project_count: i64,
}

impl Database {
    /// Point at the database file at `path`. Nothing is opened yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5_000),
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(&config.path).with_busy_timeout(Duration::from_millis(config.busy_timeout_ms))
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a read-only connection.
    fn connect(&self) -> Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&self.path, flags)
            .and_then(|conn| {
                conn.busy_timeout(self.busy_timeout)?;
                conn.execute_batch("PRAGMA query_only=ON;")?;
                Ok(conn)
            })
            .map_err(|e| {
                error!(path = %self.path.display(), "Error connecting to reporting database: {}", e);
                e
            })
            .with_context(|| format!("connecting to {}", self.path.display()))?;

        trace!(path = %self.path.display(), "Connection opened");
        Ok(conn)
    }

    /// Run `f` on a fresh connection, closing it afterwards whatever `f`
    /// returned.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.connect()?;
        let result = f(&conn);
        match conn.close() {
            Ok(()) => debug!("Connection closed"),
            // The handle is dropped either way; dropping finalizes it.
            Err((_conn, e)) => warn!("Connection did not close cleanly: {}", e),
        }
        result
    }

    /// Connect, report basic facts about the database, and disconnect.
    pub fn check(&self) -> Result<DatabaseInfo> {
        self.with_conn(|conn| {
            let sqlite_version: String = conn.query_row("SELECT sqlite_version()", [], |r| r.get(0))?;
            let table_count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |r| r.get(0),
            )?;
            let project_count: i64 =
                conn.query_row("SELECT COUNT(*) FROM project", [], |r| r.get(0))?;
            let open_project_count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM project
                 JOIN project_status ON project.project_status_id = project_status.id
                 WHERE project_status.name = ?1",
                [OPEN_PROJECT_STATUS],
                |r| r.get(0),
            )?;

            Ok(DatabaseInfo {
                path: self.path.clone(),
                sqlite_version,
                table_count,
                project_count,
                open_project_count,
            })
        })
    }
}
