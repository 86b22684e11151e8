//! # Stockline CLI
//!
//! Console menu application for managing products and their barcodes.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Stockline Console                               │
//! │                                                                         │
//! │  stdin ───► MenuHandler ───► Services ───► Repositories ───► SQLite    │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                           stockline-core                                │
//! │                        (validation, types)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod menu;

use tracing::info;
use tracing_subscriber::EnvFilter;

use stockline_db::{Database, DbConfig};

use crate::config::CliConfig;
use crate::menu::MenuHandler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Default to warn so log lines don't interleave with the menu;
    // RUST_LOG overrides for debugging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(true)
        .init();

    let config = CliConfig::load();
    info!(path = %config.database_path.display(), "Opening database");

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database ready, migrations applied");

    let result = MenuHandler::new(db.clone()).run().await;

    db.close().await;
    result?;
    Ok(())
}
