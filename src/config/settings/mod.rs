
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::client::DEFAULT_TIMEOUT_SECONDS;

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_INDEX_NAME: &str = "llm_cache";
pub const DEFAULT_TOP_K: usize = 1;
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.9;
pub const MAX_TOP_K: usize = 1000;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub marqo: MarqoConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Connection settings for the Marqo service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarqoConfig {
    pub url: Url,
    /// Embedding model for newly created indexes; the service default when unset
    pub model: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for MarqoConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("http://localhost:8882").expect("default URL is valid"),
            model: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// Cache behavior: which index to use and how lookups are filtered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub index_name: String,
    pub top_k: usize,
    pub score_threshold: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            index_name: DEFAULT_INDEX_NAME.to_string(),
            top_k: DEFAULT_TOP_K,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid protocol: {0} (must be 'http' or 'https')")]
    InvalidProtocol(String),
    #[error("Invalid model name: {0:?} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid timeout: {0} (must be between 1 and 300 seconds)")]
    InvalidTimeout(u64),
    #[error(
        "Invalid index name: {0:?} (must be non-empty and contain only letters, digits, '_' or '-')"
    )]
    InvalidIndexName(String),
    #[error("Invalid top_k: {0} (must be between 1 and 1000)")]
    InvalidTopK(usize),
    #[error("Invalid score threshold: {0} (must be a finite number)")]
    InvalidScoreThreshold(f64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Default configuration directory, e.g. `~/.config/semantic-cache`
    #[inline]
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("semantic-cache"))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Load `config.toml` from `config_dir`, falling back to defaults when the
    /// file does not exist
    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(Self {
                base_dir: config_dir.as_ref().to_path_buf(),
                ..Self::default()
            });
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.base_dir = config_dir.as_ref().to_path_buf();

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = self.get_base_dir();

        fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = self.config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn get_base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[inline]
    pub fn config_file_path(&self) -> PathBuf {
        self.get_base_dir().join(CONFIG_FILE_NAME)
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.marqo.validate()?;
        self.cache.validate()?;
        Ok(())
    }
}

impl MarqoConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url(&self.url)?;

        if let Some(model) = &self.model {
            if model.trim().is_empty() {
                return Err(ConfigError::InvalidModel(model.clone()));
            }
        }

        if !(1..=300).contains(&self.timeout_seconds) {
            return Err(ConfigError::InvalidTimeout(self.timeout_seconds));
        }

        Ok(())
    }

    pub fn set_url(&mut self, url: &str) -> Result<(), ConfigError> {
        let url = Url::parse(url).map_err(|_| ConfigError::InvalidUrl(url.to_string()))?;
        validate_url(&url)?;
        self.url = url;
        Ok(())
    }

    pub fn set_model(&mut self, model: Option<String>) -> Result<(), ConfigError> {
        if let Some(name) = &model {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidModel(name.clone()));
            }
        }
        self.model = model;
        Ok(())
    }

    pub fn set_timeout_seconds(&mut self, timeout_seconds: u64) -> Result<(), ConfigError> {
        if !(1..=300).contains(&timeout_seconds) {
            return Err(ConfigError::InvalidTimeout(timeout_seconds));
        }
        self.timeout_seconds = timeout_seconds;
        Ok(())
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_index_name(&self.index_name)?;

        if !(1..=MAX_TOP_K).contains(&self.top_k) {
            return Err(ConfigError::InvalidTopK(self.top_k));
        }

        if !self.score_threshold.is_finite() {
            return Err(ConfigError::InvalidScoreThreshold(self.score_threshold));
        }

        Ok(())
    }

    pub fn set_index_name(&mut self, index_name: String) -> Result<(), ConfigError> {
        validate_index_name(&index_name)?;
        self.index_name = index_name;
        Ok(())
    }

    pub fn set_top_k(&mut self, top_k: usize) -> Result<(), ConfigError> {
        if !(1..=MAX_TOP_K).contains(&top_k) {
            return Err(ConfigError::InvalidTopK(top_k));
        }
        self.top_k = top_k;
        Ok(())
    }

    pub fn set_score_threshold(&mut self, score_threshold: f64) -> Result<(), ConfigError> {
        if !score_threshold.is_finite() {
            return Err(ConfigError::InvalidScoreThreshold(score_threshold));
        }
        self.score_threshold = score_threshold;
        Ok(())
    }
}

fn validate_url(url: &Url) -> Result<(), ConfigError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidProtocol(url.scheme().to_string()));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidUrl(url.to_string()));
    }

    Ok(())
}

fn validate_index_name(name: &str) -> Result<(), ConfigError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidIndexName(name.to_string()))
    }
}
