//! # Client Storage
//!
//! Small key/value store for the state the dashboard keeps on the client:
//! the bearer token and the selected theme.
//!
//! ## YAML Format
//!
//! ```yaml
//! authToken: "eyJhbGciOi..."
//! theme: "dark"
//! ```

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key holding the bearer token attached to outgoing requests
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Key holding the selected theme
pub const THEME_KEY: &str = "theme";

/// Persistent string preferences
pub trait ClientStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Client storage backed by a single YAML file
pub struct FileClientStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileClientStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let yaml_content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read client storage {:?}", self.path))?;
        if yaml_content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let values = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse client storage {:?}", self.path))?;
        debug!("Loaded client storage from {:?}", self.path);
        Ok(values)
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                info!("Created client storage directory: {:?}", parent);
            }
        }

        let yaml_content = serde_yaml::to_string(values)?;

        // Write to a temp file, then rename over the original
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &self.path)?;

        debug!("Saved client storage to {:?}", self.path);
        Ok(())
    }
}

impl ClientStorage for FileClientStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("Client storage lock poisoned"))?;
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("Client storage lock poisoned"))?;
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("Client storage lock poisoned"))?;
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}

/// Client storage that lives only as long as the process
#[derive(Default)]
pub struct MemoryClientStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryClientStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(self, key: &str, value: &str) -> Self {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        self
    }
}

impl ClientStorage for MemoryClientStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().map_err(|_| anyhow!("Client storage lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| anyhow!("Client storage lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| anyhow!("Client storage lock poisoned"))?;
        values.remove(key);
        Ok(())
    }
}
