//! # Application Configuration
//!
//! Endpoints, timeouts and data source selection, stored as YAML in the
//! user's config directory.
//!
//! ```yaml
//! crud_base_url: "http://localhost:3000/api"
//! ai_base_url: "http://localhost:8000/ai"
//! crud_timeout_secs: 10
//! ai_timeout_secs: 30
//! data_source: remote_with_fallback
//! storage_path: null
//! ```
//!
//! `DASHBOARD_CRUD_URL`, `DASHBOARD_AI_URL` and `DASHBOARD_DATA_SOURCE`
//! override the file when set.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const CRUD_URL_ENV: &str = "DASHBOARD_CRUD_URL";
pub const AI_URL_ENV: &str = "DASHBOARD_AI_URL";
pub const DATA_SOURCE_ENV: &str = "DASHBOARD_DATA_SOURCE";

const CONFIG_DIR_NAME: &str = "invoice-dashboard";
const CONFIG_FILE_NAME: &str = "config.yaml";
const STORAGE_FILE_NAME: &str = "client_storage.yaml";

/// Where the gateway gets its data from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceMode {
    /// HTTP backends only; failures reach the caller
    Remote,
    /// Deterministic fixtures only (offline mode)
    Fixture,
    /// HTTP backends, served from fixtures when a call fails
    #[default]
    RemoteWithFallback,
}

impl fmt::Display for DataSourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataSourceMode::Remote => "remote",
            DataSourceMode::Fixture => "fixture",
            DataSourceMode::RemoteWithFallback => "remote_with_fallback",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DataSourceMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "remote" => Ok(DataSourceMode::Remote),
            "fixture" | "offline" => Ok(DataSourceMode::Fixture),
            "remote_with_fallback" | "fallback" => Ok(DataSourceMode::RemoteWithFallback),
            other => Err(anyhow::anyhow!("Unknown data source mode: '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the CRUD backend
    pub crud_base_url: String,
    /// Base URL of the AI extraction backend
    pub ai_base_url: String,
    pub crud_timeout_secs: u64,
    pub ai_timeout_secs: u64,
    pub data_source: DataSourceMode,
    /// Client storage file; defaults to a sibling of the config file
    pub storage_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            crud_base_url: "http://localhost:3000/api".to_string(),
            ai_base_url: "http://localhost:8000/ai".to_string(),
            crud_timeout_secs: 10,
            ai_timeout_secs: 30,
            data_source: DataSourceMode::default(),
            storage_path: None,
        }
    }
}

impl AppConfig {
    /// `<config dir>/invoice-dashboard/config.yaml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Load the config file, creating it with defaults if it doesn't exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let yaml_content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {:?}", path))?;
            let config: AppConfig = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Failed to parse config {:?}", path))?;
            debug!("Loaded config from {:?}", path);
            Ok(config)
        } else {
            let config = AppConfig::default();
            config.save(path)?;
            info!("Created default config at {:?}", path);
            Ok(config)
        }
    }

    /// Write the config atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory {:?}", parent))?;
            }
        }

        let yaml_content = serde_yaml::to_string(self)?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, path)?;

        debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(CRUD_URL_ENV) {
            info!("CRUD backend overridden to {}", url);
            self.crud_base_url = url;
        }
        if let Some(url) = lookup(AI_URL_ENV) {
            info!("AI backend overridden to {}", url);
            self.ai_base_url = url;
        }
        if let Some(mode) = lookup(DATA_SOURCE_ENV) {
            self.data_source = mode
                .parse()
                .with_context(|| format!("Invalid {} value", DATA_SOURCE_ENV))?;
            info!("Data source overridden to {}", self.data_source);
        }
        Ok(self)
    }

    pub fn crud_timeout(&self) -> Duration {
        Duration::from_secs(self.crud_timeout_secs)
    }

    pub fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs)
    }

    /// Client storage location for a config loaded from `config_path`
    pub fn resolve_storage_path(&self, config_path: &Path) -> PathBuf {
        match &self.storage_path {
            Some(path) => path.clone(),
            None => config_path
                .parent()
                .map(|dir| dir.join(STORAGE_FILE_NAME))
                .unwrap_or_else(|| PathBuf::from(STORAGE_FILE_NAME)),
        }
    }
}
