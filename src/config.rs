//! Configuration loader using Figment for layered config merging.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `semaphore.toml` (working directory) or an explicit file
//! 3. `SEMAPHORE_*` environment variables

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.semaphore.co/api/v4/";
pub const CONFIG_FILE: &str = "semaphore.toml";
const ENV_PREFIX: &str = "SEMAPHORE_";

/// Template shipped with the crate and copied by `semaphore publish`.
pub const CONFIG_TEMPLATE: &str = include_str!("../resources/semaphore.toml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemaphoreConfig {
    pub api_key: String,
    pub sender_name: Option<String>,
    pub base_url: String,
    pub timeout_secs: Option<u64>,
    /// SQLite file mirroring API records.
    pub database: Option<PathBuf>,
}

impl Default for SemaphoreConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            sender_name: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: None,
            database: None,
        }
    }
}

impl SemaphoreConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Load `./semaphore.toml` if present, with env var overrides.
pub fn load_config() -> Result<SemaphoreConfig, ConfigError> {
    Ok(build_figment(Toml::file(CONFIG_FILE)).extract()?)
}

/// Load configuration from a file that must exist, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SemaphoreConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    Ok(build_figment(Toml::file(path)).extract()?)
}

/// Load configuration from TOML text only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SemaphoreConfig, ConfigError> {
    Ok(Figment::new()
        .merge(Serialized::defaults(SemaphoreConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()?)
}

fn build_figment(file: figment::providers::Data<Toml>) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SemaphoreConfig::default()))
        .merge(file)
        .merge(Env::prefixed(ENV_PREFIX))
}
