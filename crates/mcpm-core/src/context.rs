//! Application context for unified dependency injection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::ManagerApi;
use crate::config::paths::MANAGER_DIR;
use crate::config::settings::SETTINGS_FILE;
use crate::config::{ManagerPaths, ManagerSettings, PathResolver};
use crate::error::{ManagerError, Result};
use crate::fs::JsonFileStore;
use crate::orchestration::ServerCoordinator;

/// Unified application context.
///
/// Frontends create this once and hand the coordinator (or the boundary
/// API built from it) to their command handlers.
#[derive(Debug, Clone)]
pub struct AppContext {
    home_dir: PathBuf,
    settings: ManagerSettings,
}

impl AppContext {
    /// Create a context rooted at `home_dir`, reading
    /// `<home>/.mcp-manager/settings.toml` when present.
    pub fn new(home_dir: PathBuf) -> Result<Self> {
        let settings = ManagerSettings::load(&home_dir.join(MANAGER_DIR).join(SETTINGS_FILE))?;
        Ok(Self::with_settings(home_dir, settings))
    }

    /// Create a context with explicit settings (for testing).
    pub fn with_settings(home_dir: PathBuf, settings: ManagerSettings) -> Self {
        Self { home_dir, settings }
    }

    /// Context for the current user's home directory.
    pub fn with_defaults() -> Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| ManagerError::Settings {
            path: PathBuf::from("~"),
            reason: "could not determine home directory".to_string(),
        })?;
        Self::new(home_dir)
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    pub fn paths(&self) -> ManagerPaths {
        ManagerPaths::new(self.home_dir.clone()).with_overrides(self.settings.paths.clone())
    }

    pub fn file_store(&self) -> JsonFileStore {
        JsonFileStore::with_backups(self.settings.backup.enabled)
    }

    pub fn coordinator(&self) -> ServerCoordinator {
        let paths: Arc<dyn PathResolver> = Arc::new(self.paths());
        ServerCoordinator::from_paths(self.file_store(), paths)
    }

    pub fn api(&self) -> ManagerApi {
        ManagerApi::new(self.coordinator())
    }
}
