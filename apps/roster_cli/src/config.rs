use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "roster.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.barcelos.dev".into(),
            log_filter: "info".into(),
        }
    }
}

/// A config file that exists but could not be used. Settings fall back to
/// defaults and the environment; the caller reports it once logging is up.
#[derive(Debug, Error)]
#[error("ignoring unreadable config file '{}': {source}", path.display())]
pub struct ConfigFileError {
    pub path: PathBuf,
    #[source]
    pub source: toml::de::Error,
}

/// Defaults, then `path` if it exists, then the process environment.
pub fn load_settings(path: &Path) -> (Settings, Option<ConfigFileError>) {
    load_settings_with(path, |key| std::env::var(key).ok())
}

pub(crate) fn load_settings_with(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> (Settings, Option<ConfigFileError>) {
    let mut settings = Settings::default();
    let mut file_error = None;

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_base_url") {
                    settings.api_base_url = v.clone();
                }
                if let Some(v) = file_cfg.get("log_filter") {
                    settings.log_filter = v.clone();
                }
            }
            Err(source) => {
                file_error = Some(ConfigFileError {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }
    }

    if let Some(v) = env("API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    (settings, file_error)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
