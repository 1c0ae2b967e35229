//! Server entity model.
//!
//! A [`ServerEntry`] is built fresh on every read from either the active
//! config document or the disabled store; only its fields are persisted.

pub mod kind;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{AppType, ServerScope};

pub use kind::ServerKind;

/// One configured MCP server, active or disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerEntry {
    pub name: String,
    /// Opaque server payload (command, args, env, ...).
    pub config: Value,
    pub enabled: bool,
    pub app_type: AppType,
    pub scope: ServerScope,
    pub project_path: Option<String>,
    pub project_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: ServerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_at: Option<DateTime<Utc>>,
}

/// Per-entry shape stored in `<app>-disabled.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisabledEntry {
    pub name: String,
    pub config: Value,
    pub disabled_at: DateTime<Utc>,
    #[serde(default)]
    pub project_path: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
}

impl ServerEntry {
    /// Entry found in an active config document.
    pub fn active(app_type: AppType, name: &str, config: Value, project_path: Option<&str>) -> Self {
        Self::build(app_type, name, config, true, project_path)
    }

    /// Entry about to be moved into the disabled store.
    pub fn disabled(
        app_type: AppType,
        name: &str,
        config: Value,
        project_path: Option<&str>,
    ) -> Self {
        Self::build(app_type, name, config, false, project_path)
    }

    fn build(
        app_type: AppType,
        name: &str,
        config: Value,
        enabled: bool,
        project_path: Option<&str>,
    ) -> Self {
        let kind = ServerKind::classify(&config);
        Self {
            name: name.to_string(),
            config,
            enabled,
            app_type,
            scope: ServerScope::for_project(project_path),
            project_path: project_path.map(str::to_string),
            project_name: project_path.map(project_name),
            kind,
            disabled_at: None,
        }
    }

    /// Identity across apps and scopes: `app:name:project-or-global`.
    pub fn unique_key(&self) -> String {
        unique_key(self.app_type, &self.name, self.project_path.as_deref())
    }

    /// Project this entry into the disabled store shape, stamping the
    /// current time.
    pub fn to_disabled_entry(&self) -> DisabledEntry {
        DisabledEntry {
            name: self.name.clone(),
            config: self.config.clone(),
            disabled_at: Utc::now(),
            project_path: self.project_path.clone(),
            project_name: self.project_name.clone(),
        }
    }

    /// Rebuild a disabled entry; scope follows the presence of a project path.
    pub fn from_disabled_entry(entry: DisabledEntry, app_type: AppType) -> Self {
        let kind = ServerKind::classify(&entry.config);
        let project_name = entry
            .project_name
            .or_else(|| entry.project_path.as_deref().map(project_name));
        Self {
            name: entry.name,
            config: entry.config,
            enabled: false,
            app_type,
            scope: ServerScope::for_project(entry.project_path.as_deref()),
            project_path: entry.project_path,
            project_name,
            kind,
            disabled_at: Some(entry.disabled_at),
        }
    }
}

pub fn unique_key(app_type: AppType, name: &str, project_path: Option<&str>) -> String {
    format!("{}:{}:{}", app_type, name, project_path.unwrap_or("global"))
}

/// Display name of a project: the last path component.
pub fn project_name(project_path: &str) -> String {
    Path::new(project_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| project_path.to_string())
}
