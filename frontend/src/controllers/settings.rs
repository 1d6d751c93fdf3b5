//! # Settings Controller
//!
//! Theme selection and the stored bearer token, both kept in client storage.

use std::sync::Arc;

use log::{info, warn};
use shared::{Theme, DEFAULT_THEME};

use crate::context::AppContext;
use crate::controllers::state::{Notice, Notices};
use crate::services::api::ApiError;
use crate::services::storage::{ClientStorage, AUTH_TOKEN_KEY, THEME_KEY};

pub struct SettingsController {
    storage: Arc<dyn ClientStorage>,
    theme: String,
    notices: Notices,
}

impl SettingsController {
    pub fn new(context: &AppContext) -> Self {
        let storage = context.storage();
        let theme = match storage.get(THEME_KEY) {
            Ok(Some(theme)) if Theme::is_known(&theme) => theme,
            Ok(Some(theme)) => {
                warn!("Ignoring unknown stored theme '{}'", theme);
                DEFAULT_THEME.to_string()
            }
            Ok(None) => DEFAULT_THEME.to_string(),
            Err(e) => {
                warn!("Failed to read theme, using default: {}", e);
                DEFAULT_THEME.to_string()
            }
        };

        Self {
            storage,
            theme,
            notices: Notices::default(),
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn themes(&self) -> Vec<Theme> {
        Theme::catalogue()
    }

    pub fn change_theme(&mut self, value: &str) -> Result<(), ApiError> {
        if !Theme::is_known(value) {
            let e = ApiError::UnknownTheme(value.to_string());
            self.notices.error(e.to_string());
            return Err(e);
        }

        self.persist(THEME_KEY, value)?;
        info!("Theme changed to {}", value);
        self.theme = value.to_string();
        self.notices.success("Theme updated");
        Ok(())
    }

    /// Switch between light and dark. Any other theme goes to light.
    pub fn toggle_theme(&mut self) -> Result<(), ApiError> {
        let next = if self.theme == "light" { "dark" } else { "light" };
        self.change_theme(next)
    }

    pub fn set_auth_token(&mut self, token: &str) -> Result<(), ApiError> {
        self.persist(AUTH_TOKEN_KEY, token)?;
        info!("Auth token stored");
        Ok(())
    }

    pub fn clear_auth_token(&mut self) -> Result<(), ApiError> {
        self.storage.remove(AUTH_TOKEN_KEY).map_err(|e| self.storage_error(e))?;
        info!("Auth token cleared");
        Ok(())
    }

    pub fn has_auth_token(&self) -> bool {
        matches!(self.storage.get(AUTH_TOKEN_KEY), Ok(Some(token)) if !token.is_empty())
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }

    fn persist(&mut self, key: &str, value: &str) -> Result<(), ApiError> {
        self.storage.set(key, value).map_err(|e| self.storage_error(e))
    }

    fn storage_error(&mut self, e: anyhow::Error) -> ApiError {
        let e = ApiError::Storage(format!("{:#}", e));
        self.notices.error(e.to_string());
        e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::config::AppConfig;
    use crate::services::gateway::Gateway;
    use crate::services::storage::{FileClientStorage, MemoryClientStorage};
    use tempfile::TempDir;

    fn context_with(storage: Arc<dyn ClientStorage>) -> AppContext {
        AppContext::new(AppConfig::default(), storage, Gateway::offline())
    }

    #[test]
    fn test_default_and_stored_theme() {
        let controller = SettingsController::new(&AppContext::offline());
        assert_eq!(controller.theme(), DEFAULT_THEME);
        assert_eq!(controller.themes().len(), 8);

        let stored = MemoryClientStorage::new().with_value(THEME_KEY, "cupcake");
        let controller = SettingsController::new(&context_with(Arc::new(stored)));
        assert_eq!(controller.theme(), "cupcake");

        let bogus = MemoryClientStorage::new().with_value(THEME_KEY, "neon");
        let controller = SettingsController::new(&context_with(Arc::new(bogus)));
        assert_eq!(controller.theme(), DEFAULT_THEME);
    }

    #[test]
    fn test_toggle_theme() {
        let mut controller = SettingsController::new(&AppContext::offline());
        controller.toggle_theme().unwrap();
        assert_eq!(controller.theme(), "light");
        controller.toggle_theme().unwrap();
        assert_eq!(controller.theme(), "dark");

        controller.change_theme("dracula").unwrap();
        controller.toggle_theme().unwrap();
        assert_eq!(controller.theme(), "light");
    }

    #[test]
    fn test_unknown_theme_is_rejected() {
        let mut controller = SettingsController::new(&AppContext::offline());
        assert!(matches!(controller.change_theme("neon"), Err(ApiError::UnknownTheme(_))));
        assert_eq!(controller.theme(), DEFAULT_THEME);
        assert_eq!(controller.take_notices().len(), 1);
    }

    #[test]
    fn test_theme_and_token_persist() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("client_storage.yaml");

        {
            let storage: Arc<dyn ClientStorage> = Arc::new(FileClientStorage::new(&path));
            let mut controller = SettingsController::new(&context_with(storage));
            controller.change_theme("luxury").unwrap();
            controller.set_auth_token("token-abc").unwrap();
            assert!(controller.has_auth_token());
        }

        let storage: Arc<dyn ClientStorage> = Arc::new(FileClientStorage::new(&path));
        let mut controller = SettingsController::new(&context_with(storage));
        assert_eq!(controller.theme(), "luxury");
        assert!(controller.has_auth_token());

        controller.clear_auth_token().unwrap();
        assert!(!controller.has_auth_token());
    }
}
