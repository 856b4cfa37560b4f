use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use shared::protocol::DEFAULT_PAGE_SIZE;
use thiserror::Error;
use url::Url;

pub const SETTINGS_FILE: &str = "explorer.toml";
pub const DEFAULT_BASE_URL: &str = "https://api.rawg.io/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid catalog base url '{value}': {source}")]
    InvalidBaseUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("invalid page size '{0}': expected a positive integer")]
    InvalidPageSize(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(self.base_url.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
            value: self.base_url.clone(),
            source,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    api_key: Option<String>,
    page_size: Option<u32>,
}

/// Loads settings from `explorer.toml` in the working directory, then the
/// process environment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, overridden by the file at `path` when it exists, overridden by
/// `env` lookups.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings =
                toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            if let Some(v) = file_cfg.base_url {
                settings.base_url = v;
            }
            if let Some(v) = file_cfg.api_key {
                settings.api_key = Some(v);
            }
            if let Some(v) = file_cfg.page_size {
                settings.page_size = v;
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    if let Some(v) = env("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = env("RAWG_API_KEY") {
        settings.api_key = Some(v);
    }
    if let Some(v) = env("APP__API_KEY") {
        settings.api_key = Some(v);
    }

    if let Some(v) = env("APP__PAGE_SIZE") {
        settings.page_size = v
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidPageSize(v.clone()))?;
    }

    settings.api_key = settings.api_key.filter(|key| !key.trim().is_empty());
    if settings.page_size == 0 {
        return Err(ConfigError::InvalidPageSize(settings.page_size.to_string()));
    }
    settings.parsed_base_url()?;

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
