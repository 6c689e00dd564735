pub mod config;
pub mod database;
mod store;

pub use database::Database;
pub use store::{Store, ENGINE_KEY, SESSION_KEY, SETTINGS_KEY};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the directory persisted state lives in.
///
/// `POMOTAN_DATA_DIR` wins when set. Otherwise `~/.config/pomotan[-dev]/`,
/// with the `-dev` suffix selected by `POMOTAN_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("POMOTAN_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOTAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomotan-dev")
            } else {
                base_dir.join("pomotan")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
