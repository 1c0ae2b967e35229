//! Config path resolution helpers.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use super::settings::PathOverrides;
use crate::types::AppType;

pub const MANAGER_DIR: &str = ".mcp-manager";

/// Locates the documents the manager reads and writes.
pub trait PathResolver: Debug + Send + Sync {
    /// Active config document of `app`.
    fn config_path(&self, app: AppType) -> PathBuf;

    /// Side store holding `app`'s disabled servers.
    fn disabled_store_path(&self, app: AppType) -> PathBuf {
        self.manager_dir().join(format!("{}-disabled.json", app))
    }

    fn manager_dir(&self) -> PathBuf;
}

/// Default resolver rooted at a home directory.
#[derive(Debug, Clone)]
pub struct ManagerPaths {
    home_dir: PathBuf,
    manager_dir: PathBuf,
    overrides: PathOverrides,
}

impl ManagerPaths {
    pub fn new(home_dir: PathBuf) -> Self {
        let manager_dir = home_dir.join(MANAGER_DIR);
        Self {
            home_dir,
            manager_dir,
            overrides: PathOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: PathOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }
}

impl PathResolver for ManagerPaths {
    fn config_path(&self, app: AppType) -> PathBuf {
        if let Some(path) = self.overrides.for_app(app) {
            return path.to_path_buf();
        }
        match app {
            AppType::ClaudeCode => self.home_dir.join(".claude.json"),
            AppType::ClaudeDesktop => claude_desktop_config_path(&self.home_dir),
        }
    }

    fn manager_dir(&self) -> PathBuf {
        self.manager_dir.clone()
    }
}

fn claude_desktop_config_path(home_dir: &Path) -> PathBuf {
    if cfg!(target_os = "macos") {
        home_dir.join("Library/Application Support/Claude/claude_desktop_config.json")
    } else if cfg!(windows) {
        let app_data = std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| home_dir.join("AppData").join("Roaming"));
        app_data.join("Claude").join("claude_desktop_config.json")
    } else {
        home_dir.join(".config/claude/claude_desktop_config.json")
    }
}
