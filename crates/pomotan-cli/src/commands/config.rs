use std::path::PathBuf;

use clap::Subcommand;
use pomotan_core::storage::config;
use pomotan_core::{ConfigError, Settings, Store};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a setting (e.g. "focusMinutes", "autoStart")
    Get {
        /// Setting key
        key: String,
    },
    /// Set a setting; the timer is stopped and resized to the new duration
    Set {
        /// Setting key
        key: String,
        /// New value
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// List all settings, one `key = value` per line
    List,
    /// Reset settings to defaults
    Reset,
    /// Print settings as TOML
    Export,
    /// Load settings from a TOML file
    Import {
        /// Path to a TOML file
        path: PathBuf,
    },
}

/// Apply `settings` to the persisted engine and save both.
fn apply(store: &Store, settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = store.load_engine();
    engine.apply_settings(settings);
    store.save_engine(&engine)?;
    Ok(())
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;

    match action {
        ConfigAction::Get { key } => {
            let settings = store.load_settings();
            let value = config::get(&settings, &key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let settings = config::set(&store.load_settings(), &key, &value)?;
            apply(&store, settings)?;
            println!("ok");
        }
        ConfigAction::List => {
            for (key, value) in config::list(&store.load_settings()) {
                println!("{key} = {value}");
            }
        }
        ConfigAction::Reset => {
            apply(&store, Settings::default())?;
            println!("settings reset to defaults");
        }
        ConfigAction::Export => {
            print!("{}", config::export_toml(&store.load_settings())?);
        }
        ConfigAction::Import { path } => {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;
            apply(&store, config::import_toml(&content)?)?;
            println!("ok");
        }
    }
    Ok(())
}
