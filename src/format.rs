//! Output formatting utilities for markdown and JSON.

use crate::dashboard::table::{Column, cell_text};
use crate::db::DatabaseInfo;
use anyhow::Result;
use serde_json::Value;
use std::str::FromStr;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown format '{}': expected json or markdown", other)),
        }
    }
}

/// Format rows as a pretty-printed JSON array.
pub fn format_rows_json(rows: &[Value]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Format rows as a markdown table with the given columns.
pub fn format_rows_markdown(title: &str, columns: &[Column], rows: &[Value]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {} ({})\n\n", title, rows.len()));

    if rows.is_empty() {
        md.push_str("_No rows match the current filters._\n");
        return md;
    }

    let headers: Vec<&str> = columns.iter().map(|c| c.header).collect();
    md.push_str(&format!("| {} |\n", headers.join(" | ")));
    md.push_str(&format!("|{}\n", "---|".repeat(columns.len())));

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|c| escape_cell(&cell_text(row.get(c.field))))
            .collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    md
}

/// Format the result of a connection check as markdown.
pub fn format_check_markdown(info: &DatabaseInfo) -> String {
    let mut md = String::new();
    md.push_str("## Reporting database\n");
    md.push_str(&format!("- **path**: `{}`\n", info.path.display()));
    md.push_str(&format!("- **sqlite**: {}\n", info.sqlite_version));
    md.push_str(&format!("- **tables**: {}\n", info.table_count));
    md.push_str(&format!(
        "- **projects**: {} ({} open)\n",
        info.project_count, info.open_project_count
    ));
    md
}
