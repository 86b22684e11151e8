//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use std::env;
use std::path::PathBuf;

/// Console application configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// - `STOCKLINE_DB` - database file path (default: `stockline.db` in the
    ///   working directory)
    pub fn load() -> Self {
        CliConfig {
            database_path: env::var("STOCKLINE_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("stockline.db")),
        }
    }
}
