//! Treehouse Dashboard Library
//!
//! This module exports the core components for testing and integration.

pub mod calcs;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod filters;
pub mod format;
pub mod types;
pub mod window;
