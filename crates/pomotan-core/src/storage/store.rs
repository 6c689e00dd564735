//! Persisted engine state on top of the kv table.
//!
//! Reads never fail: a missing or malformed value falls back to the
//! documented default and is logged. Writes propagate their errors.

use tracing::warn;

use super::database::Database;
use crate::error::Result;
use crate::timer::{SessionEngine, SessionKind, Settings};

/// Settings blob, JSON with camelCase keys.
pub const SETTINGS_KEY: &str = "settings";
/// Last known session kind tag.
pub const SESSION_KEY: &str = "currentSession";
/// Full engine state, used by one-shot CLI invocations.
pub const ENGINE_KEY: &str = "engine";

pub struct Store {
    db: Database,
}

impl Store {
    /// Open the store in the default data directory.
    pub fn open() -> Result<Self> {
        Ok(Self::new(Database::open()?))
    }

    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.db.kv_get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to read persisted value, using default");
                None
            }
        }
    }

    /// Persisted settings, clamped, or the defaults.
    pub fn load_settings(&self) -> Settings {
        let Some(json) = self.read(SETTINGS_KEY) else {
            return Settings::default();
        };
        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => settings.clamped(),
            Err(e) => {
                warn!(error = %e, "malformed settings blob, using defaults");
                Settings::default()
            }
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string(settings)?;
        self.db.kv_set(SETTINGS_KEY, &json)?;
        Ok(())
    }

    /// Persisted session kind, or `Focus`.
    pub fn load_session_kind(&self) -> SessionKind {
        let Some(tag) = self.read(SESSION_KEY) else {
            return SessionKind::default();
        };
        tag.parse().unwrap_or_else(|e| {
            warn!(error = %e, "unrecognized session tag, using focus");
            SessionKind::default()
        })
    }

    pub fn save_session_kind(&self, kind: SessionKind) -> Result<()> {
        self.db.kv_set(SESSION_KEY, kind.as_tag())?;
        Ok(())
    }

    /// The engine as last saved, reconciled with the persisted settings.
    ///
    /// Without a usable engine record a fresh idle engine is seeded from the
    /// persisted settings and session kind.
    pub fn load_engine(&self) -> SessionEngine {
        let settings = self.load_settings();
        let saved = self.read(ENGINE_KEY).and_then(|json| {
            serde_json::from_str::<SessionEngine>(&json)
                .map_err(|e| warn!(error = %e, "malformed engine record, reseeding"))
                .ok()
        });

        match saved {
            Some(engine) => {
                let mut engine = engine.sanitized();
                if *engine.settings() != settings {
                    engine.apply_settings(settings);
                }
                engine
            }
            None => SessionEngine::with_session(settings, self.load_session_kind()),
        }
    }

    /// Save the engine together with its settings and session kind.
    pub fn save_engine(&self, engine: &SessionEngine) -> Result<()> {
        let json = serde_json::to_string(engine)?;
        self.db.kv_set(ENGINE_KEY, &json)?;
        self.save_settings(engine.settings())?;
        self.save_session_kind(engine.current_session())?;
        Ok(())
    }
}
