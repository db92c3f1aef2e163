use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde_json::Error as SerdeError;

use crate::config::ClientSettings;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "HotelPricingAssistant";
const APP_NAME: &str = "HotelPricingAssistant";
const SETTINGS_FILE: &str = "settings.json";

pub fn settings_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

/// `Ok(None)` when no settings have been saved yet.
pub fn load_settings() -> Result<Option<ClientSettings>, PersistError> {
    let Some(path) = settings_file() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(&path)?;
    let settings = serde_json::from_str(&data)?;
    tracing::debug!(path = %path.display(), "loaded persisted settings");
    Ok(Some(settings))
}

pub fn save_settings(settings: &ClientSettings) -> Result<PathBuf, PersistError> {
    let path = settings_file().ok_or(PersistError::StorageUnavailable)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(&path, json)?;
    tracing::info!(path = %path.display(), "saved settings");
    Ok(path)
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}
