#![allow(dead_code)]

use std::path::PathBuf;

use serde_json::Value;
use tempfile::TempDir;

use mcpm_core::config::PathResolver;
use mcpm_core::config::settings::{BackupSettings, ManagerSettings};
use mcpm_core::context::AppContext;
use mcpm_core::orchestration::ServerCoordinator;
use mcpm_core::types::AppType;

/// Temporary home directory with a context pointed at it.
pub struct Sandbox {
    pub temp: TempDir,
    pub ctx: AppContext,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let settings = ManagerSettings {
            backup: BackupSettings { enabled: false },
            ..ManagerSettings::default()
        };
        let ctx = AppContext::with_settings(temp.path().to_path_buf(), settings);
        Self { temp, ctx }
    }

    pub fn coordinator(&self) -> ServerCoordinator {
        self.ctx.coordinator()
    }

    pub fn config_path(&self, app: AppType) -> PathBuf {
        self.ctx.paths().config_path(app)
    }

    pub fn disabled_path(&self, app: AppType) -> PathBuf {
        self.ctx.paths().disabled_store_path(app)
    }

    pub fn write_config(&self, app: AppType, value: &Value) {
        write_json(&self.config_path(app), value);
    }

    pub fn read_config(&self, app: AppType) -> Value {
        read_json(&self.config_path(app))
    }

    pub fn read_disabled(&self, app: AppType) -> Value {
        read_json(&self.disabled_path(app))
    }
}

pub fn write_json(path: &std::path::Path, value: &Value) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    std::fs::write(path, serde_json::to_vec_pretty(value).unwrap()).expect("Failed to write JSON");
}

pub fn read_json(path: &std::path::Path) -> Value {
    let bytes = std::fs::read(path).expect("Failed to read JSON");
    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}

/// Make the next atomic save of `path` fail by occupying its temp file name.
pub fn block_saves(path: &std::path::Path) {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    std::fs::create_dir_all(PathBuf::from(tmp).join("blocked")).expect("Failed to block saves");
}

pub fn unblock_saves(path: &std::path::Path) {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    std::fs::remove_dir_all(PathBuf::from(tmp)).expect("Failed to unblock saves");
}
