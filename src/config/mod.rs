//! Layered configuration.
//!
//! Tiers, lowest to highest priority, merged field-by-field:
//! 1. **Defaults** - built into the binary
//! 2. **Project** - `$CWD/treehouse/config.yaml`
//! 3. **User** - `~/.treehouse/config.yaml`
//! 4. **Environment** - variables listed below
//!
//! Command-line options are applied on top by the binary.
//!
//! ## Environment Variables
//! - `TREEHOUSE_CONFIG_PATH` - Explicit config file (replaces the file tiers)
//! - `TREEHOUSE_DB_PATH` - Reporting database path
//! - `TREEHOUSE_HOST` - Listen address
//! - `TREEHOUSE_PORT` - Listen port
//! - `TREEHOUSE_USER_DIR` - User config dir (default: `~/.treehouse`)
//! - `TREEHOUSE_PROJECT_DIR` - Project config dir (default: `./treehouse`)

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;
