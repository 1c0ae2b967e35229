//! Manager settings (`settings.toml` in the manager directory).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ManagerError, Result};
use crate::types::AppType;

pub const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManagerSettings {
    #[serde(default)]
    pub paths: PathOverrides,
    #[serde(default)]
    pub backup: BackupSettings,
}

/// Replacement locations for the applications' active config documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathOverrides {
    #[serde(default)]
    pub claude_code: Option<PathBuf>,
    #[serde(default)]
    pub claude_desktop: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackupSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_enabled() -> bool {
    true
}

impl PathOverrides {
    pub fn for_app(&self, app: AppType) -> Option<&Path> {
        match app {
            AppType::ClaudeCode => self.claude_code.as_deref(),
            AppType::ClaudeDesktop => self.claude_desktop.as_deref(),
        }
    }
}

impl ManagerSettings {
    /// Load settings, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(ManagerError::io("read", path, err)),
        };
        Self::parse(&content).map_err(|reason| ManagerError::Settings {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse settings content; the error is a human-readable reason.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        let settings: ManagerSettings = toml::from_str(content).map_err(|e| e.to_string())?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        for app in AppType::ALL {
            if let Some(path) = self.paths.for_app(app)
                && !path.is_absolute()
            {
                return Err(format!(
                    "path override for {app} must be absolute: {}",
                    path.display()
                ));
            }
        }
        Ok(())
    }
}
