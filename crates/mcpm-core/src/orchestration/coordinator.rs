//! Cross-store server transitions.
//!
//! A server is either active (in its app's config document) or disabled (in
//! the manager's side store). Transitions that touch both documents undo the
//! first write when the second fails; moves and copies stay within one
//! document and are a single atomic save.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{ActiveConfigStore, ActiveDocument, DisabledStore, PathResolver};
use crate::error::{ManagerError, Result};
use crate::fs::JsonFileStore;
use crate::server::{ServerEntry, project_name, unique_key};
use crate::types::{AppType, ServerScope};

/// Location and presence of an app's active config document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigPathInfo {
    pub path: PathBuf,
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
    pub path: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ServerCoordinator {
    active: ActiveConfigStore,
    disabled: DisabledStore,
}

impl ServerCoordinator {
    pub fn new(active: ActiveConfigStore, disabled: DisabledStore) -> Self {
        Self { active, disabled }
    }

    /// Coordinator whose stores share one resolver and file store.
    pub fn from_paths(files: JsonFileStore, paths: Arc<dyn PathResolver>) -> Self {
        Self::new(
            ActiveConfigStore::new(files, Arc::clone(&paths)),
            DisabledStore::new(files, paths),
        )
    }

    pub fn active_store(&self) -> &ActiveConfigStore {
        &self.active
    }

    pub fn disabled_store(&self) -> &DisabledStore {
        &self.disabled
    }

    /// Every server of every app, active and disabled, one per unique key.
    ///
    /// Active entries are merged after disabled ones so they win a key
    /// collision. Sorted by app, scope (global first), project name, name.
    pub fn list_all(&self) -> Result<Vec<ServerEntry>> {
        let mut merged: Vec<ServerEntry> = Vec::new();
        for app in AppType::ALL {
            merged.extend(self.disabled.load_all(app)?);
        }
        for app in AppType::ALL {
            merged.extend(self.active.entries(app)?);
        }

        let mut by_key: HashMap<String, ServerEntry> = HashMap::new();
        for server in merged {
            by_key.insert(server.unique_key(), server);
        }

        let mut servers: Vec<ServerEntry> = by_key.into_values().collect();
        servers.sort_by(compare_servers);
        Ok(servers)
    }

    /// Move a server from the active document into the disabled store.
    pub fn disable(&self, app: AppType, name: &str, project_path: Option<&str>) -> Result<()> {
        ensure_scope_supported(app, project_path)?;

        let Some(mut document) = self.active.load(app)? else {
            return Err(ManagerError::NotFound(format!(
                "config file not found: {}",
                self.active.config_path(app).display()
            )));
        };
        let snapshot = document.clone();

        let config = document
            .take_server(name, project_path)
            .ok_or_else(|| not_found(app, name, project_path))?;
        self.active.save(&document)?;

        let server = ServerEntry::disabled(app, name, config, project_path);
        if let Err(err) = self.disabled.add(app, &server) {
            if let Err(rollback) = self.active.save(&snapshot) {
                tracing::error!(
                    key = %server.unique_key(),
                    error = %rollback,
                    "failed to restore config after disable failure"
                );
            }
            return Err(err);
        }

        tracing::info!(key = %server.unique_key(), "disabled server");
        Ok(())
    }

    /// Move a server from the disabled store back into the active document.
    pub fn enable(&self, app: AppType, name: &str, project_path: Option<&str>) -> Result<()> {
        ensure_scope_supported(app, project_path)?;

        let server = self.disabled.remove(app, name, project_path)?;
        if let Err(err) = self.restore_active(app, &server) {
            if let Err(rollback) = self.disabled.add(app, &server) {
                tracing::error!(
                    key = %server.unique_key(),
                    error = %rollback,
                    "failed to return server to disabled store after enable failure"
                );
            }
            return Err(err);
        }

        tracing::info!(key = %server.unique_key(), "enabled server");
        Ok(())
    }

    pub fn set_enabled(
        &self,
        app: AppType,
        name: &str,
        project_path: Option<&str>,
        enabled: bool,
    ) -> Result<()> {
        if enabled {
            self.enable(app, name, project_path)
        } else {
            self.disable(app, name, project_path)
        }
    }

    /// Move an active claude-code server between global scope and projects.
    ///
    /// `None` stands for global scope on either end.
    pub fn move_server(&self, name: &str, from: Option<&str>, to: Option<&str>) -> Result<()> {
        let app = AppType::ClaudeCode;
        if from == to {
            return Err(ManagerError::InvalidMove(format!(
                "'{name}' is already at {}",
                from.unwrap_or("global")
            )));
        }

        let mut document = self
            .active
            .load(app)?
            .ok_or_else(|| not_found(app, name, from))?;
        let config = document
            .server(name, from)
            .cloned()
            .ok_or_else(|| not_found(app, name, from))?;
        self.ensure_target_free(app, &document, name, to)?;

        document.take_server(name, from);
        document.insert_server(name, to, config)?;
        self.active.save(&document)?;

        tracing::info!(
            server = name,
            from = from.unwrap_or("global"),
            to = to.unwrap_or("global"),
            "moved server"
        );
        Ok(())
    }

    pub fn move_global_to_project(&self, name: &str, to_project: &str) -> Result<()> {
        self.move_server(name, None, Some(to_project))
    }

    pub fn move_project_to_global(&self, name: &str, from_project: &str) -> Result<()> {
        self.move_server(name, Some(from_project), None)
    }

    /// Duplicate an active project server into another project.
    pub fn copy_project_to_project(
        &self,
        name: &str,
        from_project: &str,
        to_project: &str,
    ) -> Result<()> {
        let app = AppType::ClaudeCode;
        let mut document = self
            .active
            .load(app)?
            .ok_or_else(|| not_found(app, name, Some(from_project)))?;
        let config = document
            .server(name, Some(from_project))
            .cloned()
            .ok_or_else(|| not_found(app, name, Some(from_project)))?;
        self.ensure_target_free(app, &document, name, Some(to_project))?;

        document.insert_server(name, Some(to_project), config)?;
        self.active.save(&document)?;

        tracing::info!(server = name, from = from_project, to = to_project, "copied server");
        Ok(())
    }

    pub fn config_path_info(&self, app: AppType) -> ConfigPathInfo {
        ConfigPathInfo {
            path: self.active.config_path(app),
            exists: self.active.exists(app),
        }
    }

    /// Projects known to claude-code, excluding the filesystem root.
    pub fn list_projects(&self) -> Result<Vec<ProjectInfo>> {
        let Some(document) = self.active.load(AppType::ClaudeCode)? else {
            return Ok(Vec::new());
        };
        Ok(document
            .project_paths()
            .into_iter()
            .filter(|path| path != "/")
            .map(|path| ProjectInfo {
                name: project_name(&path),
                path,
            })
            .collect())
    }

    fn restore_active(&self, app: AppType, server: &ServerEntry) -> Result<()> {
        let project_path = server.project_path.as_deref();
        let mut document = self.active.load_or_empty(app)?;
        let previous =
            document.insert_server(&server.name, project_path, server.config.clone())?;
        if previous.is_some() {
            tracing::warn!(
                key = %server.unique_key(),
                "overwriting active server with re-enabled entry"
            );
        }
        self.active.save(&document)
    }

    fn ensure_target_free(
        &self,
        app: AppType,
        document: &ActiveDocument,
        name: &str,
        to: Option<&str>,
    ) -> Result<()> {
        let target = to.unwrap_or("global");
        if document.contains_server(name, to) {
            return Err(ManagerError::Conflict(format!(
                "server '{name}' already exists at {target}"
            )));
        }
        if self.disabled.contains(app, name, to)? {
            return Err(ManagerError::Conflict(format!(
                "a disabled server '{}' already exists at {target}",
                unique_key(app, name, to)
            )));
        }
        Ok(())
    }
}

fn ensure_scope_supported(app: AppType, project_path: Option<&str>) -> Result<()> {
    if project_path.is_some() && !app.supports_projects() {
        return Err(ManagerError::UnsupportedScope {
            app: app.to_string(),
        });
    }
    Ok(())
}

fn not_found(app: AppType, name: &str, project_path: Option<&str>) -> ManagerError {
    match project_path {
        Some(project_path) => ManagerError::NotFound(format!(
            "{app} project server not found: {name} in {project_path}"
        )),
        None => ManagerError::NotFound(format!("{app} global server not found: {name}")),
    }
}

fn compare_servers(a: &ServerEntry, b: &ServerEntry) -> Ordering {
    a.app_type
        .as_str()
        .cmp(b.app_type.as_str())
        .then_with(|| scope_rank(a.scope).cmp(&scope_rank(b.scope)))
        .then_with(|| {
            a.project_name
                .as_deref()
                .unwrap_or_default()
                .cmp(b.project_name.as_deref().unwrap_or_default())
        })
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.project_path.cmp(&b.project_path))
}

fn scope_rank(scope: ServerScope) -> u8 {
    match scope {
        ServerScope::Global => 0,
        ServerScope::Project => 1,
    }
}
