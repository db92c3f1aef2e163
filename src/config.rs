//! Client settings: where the prediction service lives and which optional
//! enrichments a submission requests.
//!
//! Precedence, lowest first: built-in defaults, the persisted settings file,
//! then `HOTEL_PRICING_*` environment variables.

use std::{env, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::persistence::{load_settings, save_settings, settings_file, PersistError};

pub const ENV_BASE_URL: &str = "HOTEL_PRICING_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "HOTEL_PRICING_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "HOTEL_PRICING_LOG_LEVEL";

const MAX_TIMEOUT_SECS: u64 = 300;
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: String },
    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl SettingsError {
    fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub enrichments: Enrichments,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Optional endpoints called next to the mandatory estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichments {
    #[serde(default = "enabled")]
    pub predict_price: bool,
    #[serde(default = "enabled")]
    pub predict_today: bool,
}

impl Default for Enrichments {
    fn default() -> Self {
        Self {
            predict_price: true,
            predict_today: true,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn enabled() -> bool {
    true
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            enrichments: Enrichments::default(),
            log_level: default_log_level(),
        }
    }
}

impl ClientSettings {
    /// Persisted settings (or defaults) with environment overrides applied.
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = load_settings()?.unwrap_or_default();
        settings.apply_env(|key| env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validates and writes these settings to the platform config dir.
    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        self.validate()?;
        Ok(save_settings(self)?)
    }

    /// Writes the defaults on first launch so there is a file to edit.
    /// Returns the path only when a file was created.
    pub fn write_default_file() -> Result<Option<PathBuf>, SettingsError> {
        match settings_file() {
            Some(path) if !path.exists() => Self::default().save().map(Some),
            _ => Ok(None),
        }
    }

    /// Applies overrides from `lookup`, usually `std::env::var`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| SettingsError::invalid("timeout_secs", format!("'{raw}' is not a number")))?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            self.log_level = level.trim().to_ascii_lowercase();
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|err| SettingsError::invalid("base_url", err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SettingsError::invalid(
                "base_url",
                "must be an http or https URL",
            ));
        }

        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(SettingsError::invalid(
                "timeout_secs",
                format!("must be between 1 and {MAX_TIMEOUT_SECS}"),
            ));
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(SettingsError::invalid(
                "log_level",
                format!(
                    "'{}' is not one of {}",
                    self.log_level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}
