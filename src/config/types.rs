//! Configuration types and structures.

use crate::window::DEFAULT_WINDOW_DAYS;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default port for the web dashboard.
pub const DEFAULT_PORT: u16 = 8050;

/// Rows per table page when a page has no explicit size.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Load configuration from a single YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Reporting database location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite reporting replica of the tracking database.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// How long a query waits on a locked database before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("treehouse.db")
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Page behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Span of the last week / now / next week buttons, in days.
    #[serde(default = "default_window_days")]
    pub window_days: i64,

    /// Rows per table page for pages not listed in `page_sizes`.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Rows per table page, keyed by page slug (e.g. `project-details`).
    #[serde(default = "DashboardConfig::default_page_sizes")]
    pub page_sizes: HashMap<String, usize>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            default_page_size: default_page_size(),
            page_sizes: Self::default_page_sizes(),
        }
    }
}

impl DashboardConfig {
    pub fn default_page_sizes() -> HashMap<String, usize> {
        [
            ("projects-summary", 10),
            ("project-details", 20),
            ("shot-details", 10),
            ("task-comments", 10),
            ("project-nav", 100),
        ]
        .into_iter()
        .map(|(slug, size)| (slug.to_string(), size))
        .collect()
    }

    /// Rows per table page for `slug`. Never zero.
    pub fn page_size(&self, slug: &str) -> usize {
        self.page_sizes
            .get(slug)
            .copied()
            .unwrap_or(self.default_page_size)
            .max(1)
    }
}

fn default_window_days() -> i64 {
    DEFAULT_WINDOW_DAYS
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.database.path, PathBuf::from("treehouse.db"));
        assert_eq!(config.dashboard.window_days, 14);
        assert_eq!(config.dashboard.page_size("project-details"), 20);
        assert_eq!(config.dashboard.page_size("artist-data"), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn page_size_is_never_zero() {
        let mut dashboard = DashboardConfig::default();
        dashboard.page_sizes.insert("asset-data".to_string(), 0);
        assert_eq!(dashboard.page_size("asset-data"), 1);
    }

    #[test]
    fn partial_sections_keep_field_defaults() {
        let config: Config = serde_yaml::from_str(
            r#"
server:
  port: 9000
dashboard:
  window_days: 7
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.dashboard.window_days, 7);
        assert_eq!(config.dashboard.page_size("shot-details"), 10);
    }
}
