//! Treehouse Dashboard
//!
//! A web dashboard tracking production progress for animation and VFX
//! projects, read from a reporting replica of the production database.

use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use treehouse_dashboard::cli::report::run_report;
use treehouse_dashboard::cli::{Cli, Command};
use treehouse_dashboard::config::{ConfigLoader, ConfigPaths};
use treehouse_dashboard::dashboard::{self, DashboardServer};
use treehouse_dashboard::db::Database;
use treehouse_dashboard::format::format_check_markdown;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    // Load configuration with tier merging; --config replaces the tiers
    let mut paths = ConfigPaths::discover();
    if let Some(config_path) = &cli.config {
        paths = paths.with_explicit(config_path);
    }
    let mut loader = ConfigLoader::load_with_paths(paths)?;

    if let Some(path) = loader.config_path() {
        info!("Using config {}", path.display());
    }

    cli.apply_overrides(loader.config_mut());
    let config = loader.into_config();

    match cli.command {
        Some(Command::Check) => {
            let info = Database::from_config(&config.database).check()?;
            println!("{}", format_check_markdown(&info));
        }
        Some(Command::Report(args)) => {
            run_report(&config, &args)?;
        }
        Some(Command::Serve) | None => {
            info!(
                "Reading production data from {}",
                config.database.path.display()
            );
            dashboard::serve(DashboardServer::from_config(config)).await?;
        }
    }

    Ok(())
}
