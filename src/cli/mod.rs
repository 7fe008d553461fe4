//! CLI command definitions for treehouse-dashboard
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod report;

use crate::config::Config;
use clap::{Parser, Subcommand};
use report::ReportArgs;
use std::path::PathBuf;

/// Production tracking dashboard for animation and VFX pipelines
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (skips the project and user tiers)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the reporting database (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Listen port (overrides config, default: 8050)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(db_path) = &self.database {
            config.database.path = db_path.clone();
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web dashboard (default if no subcommand given)
    Serve,

    /// Connect to the reporting database, print a summary and disconnect
    Check,

    /// Print the rows of one page, with derived columns, to stdout or a file
    Report(ReportArgs),
}
