//! Report subcommand for treehouse-dashboard CLI
//!
//! Prints the rows a dashboard page would show, derived columns included,
//! after applying the same window and dropdown filters.

use crate::config::Config;
use crate::dashboard::pages::{self, Page, ViewRequest};
use crate::db::Database;
use crate::format::{OutputFormat, format_rows_json, format_rows_markdown};
use crate::window::DateWindow;
use anyhow::{Result, bail};
use chrono::Local;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the report subcommand
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Page to report, e.g. `shot-data` or `artist-data`
    pub page: String,

    /// Date window applied to task dates
    #[arg(short, long, value_enum, value_name = "WINDOW")]
    pub window: Option<DateWindow>,

    /// Dropdown selection, repeatable (e.g. `-f project=Alpha -f department=Anim`)
    #[arg(short = 'f', long = "filter", value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Output format: json or markdown
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl ReportArgs {
    /// The query pairs a browser would send for the same view.
    pub fn pairs(&self) -> Result<Vec<(String, String)>> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 1);
        for filter in &self.filters {
            let Some((field, value)) = filter.split_once('=') else {
                bail!("Invalid filter '{}': expected FIELD=VALUE", filter);
            };
            pairs.push((field.trim().to_string(), value.trim().to_string()));
        }
        if let Some(window) = self.window {
            pairs.push(("window".to_string(), window.as_str().to_string()));
        }
        Ok(pairs)
    }
}

/// Run the report subcommand.
pub fn run_report(config: &Config, args: &ReportArgs) -> Result<()> {
    let Some(page) = Page::from_slug(&args.page) else {
        let known: Vec<&str> = Page::all().iter().map(Page::slug).collect();
        bail!("Unknown page '{}'. Available: {}", args.page, known.join(", "));
    };

    let request = ViewRequest::from_pairs(page, &args.pairs()?)?;
    let db = Database::from_config(&config.database);
    let now = Local::now().naive_local();
    let data = pages::load(&db, page, &request, now, config.dashboard.window_days)?;

    let rendered = match args.format {
        OutputFormat::Json => format_rows_json(&data.rows)?,
        OutputFormat::Markdown => format_rows_markdown(page.title(), page.columns(), &data.rows),
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            info!(page = page.slug(), rows = data.rows.len(), path = %path.display(), "Report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}
