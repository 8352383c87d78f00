mod config;
pub mod database;
mod state_store;

pub use config::Config;
pub use database::Database;
pub use state_store::{MemoryStateStore, SqliteStateStore, StateStore, APP_STATE_KEY};

use std::path::PathBuf;

/// Returns `~/.config/pomocourse[-dev]/` based on POMOCOURSE_ENV.
///
/// Set POMOCOURSE_ENV=dev to use the development data directory, or
/// POMOCOURSE_HOME to point at an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("POMOCOURSE_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOCOURSE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomocourse-dev")
            } else {
                base_dir.join("pomocourse")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
