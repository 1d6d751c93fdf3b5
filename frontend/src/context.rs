//! # Application Context
//!
//! Explicitly initialized bundle of the configuration, client storage and
//! service gateway. Controllers receive it on construction instead of
//! reaching for ambient globals.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use crate::services::config::AppConfig;
use crate::services::gateway::Gateway;
use crate::services::storage::{ClientStorage, FileClientStorage, MemoryClientStorage};

#[derive(Clone)]
pub struct AppContext {
    config: Arc<AppConfig>,
    storage: Arc<dyn ClientStorage>,
    gateway: Gateway,
}

impl AppContext {
    pub fn new(config: AppConfig, storage: Arc<dyn ClientStorage>, gateway: Gateway) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            gateway,
        }
    }

    /// Build the context for a config loaded from `config_path`, with file
    /// backed client storage next to it
    pub fn initialize(config: AppConfig, config_path: &Path) -> Result<Self> {
        let file_storage = FileClientStorage::new(config.resolve_storage_path(config_path));
        info!("Client storage at {:?}", file_storage.path());

        let storage: Arc<dyn ClientStorage> = Arc::new(file_storage);
        let gateway = Gateway::from_config(&config, storage.clone()).context("Failed to build service gateway")?;

        Ok(Self::new(config, storage, gateway))
    }

    /// Fixture-only context with in-memory storage
    pub fn offline() -> Self {
        let config = AppConfig {
            data_source: crate::services::config::DataSourceMode::Fixture,
            ..AppConfig::default()
        };
        Self::new(config, Arc::new(MemoryClientStorage::new()), Gateway::offline())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn storage(&self) -> Arc<dyn ClientStorage> {
        self.storage.clone()
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }
}
