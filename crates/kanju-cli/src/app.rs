//! Everything a command needs, built once per run from the command line.

use std::path::Path;

use kanju_core::config::AppConfig;
use kanju_core::error::KanjuError;
use kanju_core::{FileStore, HistoryStore};
use kanju_parse::PlatformDatabase;

use crate::cli::Cli;

pub struct Kanju {
    pub config: AppConfig,
    pub platforms: PlatformDatabase,
    pub history: HistoryStore<FileStore>,
}

impl Kanju {
    pub fn new(cli: &Cli) -> Result<Self, KanjuError> {
        let config = match &cli.config {
            Some(path) => AppConfig::load_from(path)?,
            None => AppConfig::load()?,
        };
        let data_dir = cli.data_dir.clone().unwrap_or_else(AppConfig::data_dir);
        let platforms = load_platforms(&AppConfig::platforms_path());
        Ok(Self::with_parts(config, platforms, FileStore::new(data_dir)))
    }

    pub fn with_parts(config: AppConfig, platforms: PlatformDatabase, store: FileStore) -> Self {
        let history = HistoryStore::with_key(store, config.history.storage_key.clone());
        Self {
            config,
            platforms,
            history,
        }
    }
}

/// Embedded platforms, with the user's table merged over them when present.
fn load_platforms(user_path: &Path) -> PlatformDatabase {
    let mut db = PlatformDatabase::embedded();
    if !user_path.exists() {
        return db;
    }
    match std::fs::read_to_string(user_path)
        .map_err(|e| e.to_string())
        .and_then(|s| PlatformDatabase::from_toml(&s).map_err(|e| e.to_string()))
    {
        Ok(user_db) => {
            tracing::debug!(path = %user_path.display(), count = user_db.len(), "Merged user platforms");
            db.merge_user(&user_db);
        }
        Err(e) => tracing::warn!(path = %user_path.display(), "Ignoring user platforms: {e}"),
    }
    db
}
