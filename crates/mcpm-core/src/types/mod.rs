//! Shared core types used across the configuration and server layers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ManagerError;

/// Client applications whose MCP configuration is managed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppType {
    /// Claude Code CLI (`~/.claude.json`, global and per-project servers).
    ClaudeCode,
    /// Claude Desktop (global servers only).
    ClaudeDesktop,
}

impl AppType {
    /// Every managed application, in listing order.
    pub const ALL: [AppType; 2] = [AppType::ClaudeCode, AppType::ClaudeDesktop];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppType::ClaudeCode => "claude-code",
            AppType::ClaudeDesktop => "claude-desktop",
        }
    }

    /// Whether the application's config document carries a `projects` map.
    pub fn supports_projects(&self) -> bool {
        matches!(self, AppType::ClaudeCode)
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppType {
    type Err = ManagerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "claude-code" => Ok(AppType::ClaudeCode),
            "claude-desktop" => Ok(AppType::ClaudeDesktop),
            other => Err(ManagerError::UnknownAppType(other.to_string())),
        }
    }
}

/// Where a server applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerScope {
    /// Top-level `mcpServers` map.
    Global,
    /// Nested under `projects.<path>.mcpServers`.
    Project,
}

impl ServerScope {
    pub fn for_project(project_path: Option<&str>) -> Self {
        match project_path {
            Some(_) => ServerScope::Project,
            None => ServerScope::Global,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerScope::Global => "global",
            ServerScope::Project => "project",
        }
    }
}

impl fmt::Display for ServerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerScope {
    type Err = ManagerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "global" => Ok(ServerScope::Global),
            "project" => Ok(ServerScope::Project),
            other => Err(ManagerError::InvalidScope(other.to_string())),
        }
    }
}
