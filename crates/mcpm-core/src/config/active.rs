//! Access to the applications' live MCP config documents.
//!
//! Global servers live under the top-level `mcpServers` map. Project-capable
//! apps also keep `projects.<path>.mcpServers`. Every other key in the
//! document is carried through untouched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use super::paths::PathResolver;
use crate::error::{ManagerError, Result};
use crate::fs::JsonFileStore;
use crate::server::ServerEntry;
use crate::types::AppType;

pub const MCP_SERVERS: &str = "mcpServers";
pub const PROJECTS: &str = "projects";

/// In-memory copy of one active config document.
///
/// Cloning yields an independent snapshot suitable for rollback.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDocument {
    path: PathBuf,
    root: Map<String, Value>,
}

impl ActiveDocument {
    /// Empty document destined for `path`.
    pub fn empty(path: PathBuf) -> Self {
        Self {
            path,
            root: Map::new(),
        }
    }

    pub fn from_value(path: PathBuf, value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { path, root }),
            _ => Err(ManagerError::invalid_document(
                &path,
                "expected JSON object at root",
            )),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn server(&self, name: &str, project_path: Option<&str>) -> Option<&Value> {
        self.servers_map(project_path)?.get(name)
    }

    pub fn contains_server(&self, name: &str, project_path: Option<&str>) -> bool {
        self.server(name, project_path).is_some()
    }

    /// Remove a server, pruning containers it leaves empty.
    ///
    /// An emptied project `mcpServers` map is dropped, then the project entry
    /// if nothing else remains in it, then `projects` if it has no entries.
    pub fn take_server(&mut self, name: &str, project_path: Option<&str>) -> Option<Value> {
        let Some(project_path) = project_path else {
            return self
                .root
                .get_mut(MCP_SERVERS)
                .and_then(Value::as_object_mut)
                .and_then(|servers| servers.remove(name));
        };

        let projects = self.root.get_mut(PROJECTS).and_then(Value::as_object_mut)?;
        let project = projects.get_mut(project_path).and_then(Value::as_object_mut)?;
        let servers = project.get_mut(MCP_SERVERS).and_then(Value::as_object_mut)?;
        let removed = servers.remove(name)?;

        if servers.is_empty() {
            project.remove(MCP_SERVERS);
        }
        if project.is_empty() {
            projects.remove(project_path);
        }
        if projects.is_empty() {
            self.root.remove(PROJECTS);
        }
        Some(removed)
    }

    /// Insert a server, creating `mcpServers`, `projects` and the project
    /// entry on demand. Returns the config previously stored under `name`.
    pub fn insert_server(
        &mut self,
        name: &str,
        project_path: Option<&str>,
        config: Value,
    ) -> Result<Option<Value>> {
        let path = self.path.clone();
        let container = match project_path {
            None => &mut self.root,
            Some(project_path) => {
                let projects = child_object(&mut self.root, PROJECTS, &path)?;
                child_object(projects, project_path, &path)?
            }
        };
        let servers = child_object(container, MCP_SERVERS, &path)?;
        Ok(servers.insert(name.to_string(), config))
    }

    /// Decompose the document into entries for both scopes.
    ///
    /// Project servers are only reported for project-capable apps.
    pub fn entries(&self, app_type: AppType) -> Vec<ServerEntry> {
        let mut entries: Vec<ServerEntry> = self
            .servers_map(None)
            .into_iter()
            .flatten()
            .map(|(name, config)| ServerEntry::active(app_type, name, config.clone(), None))
            .collect();

        if app_type.supports_projects() {
            for project_path in self.project_paths() {
                let Some(servers) = self.servers_map(Some(project_path.as_str())) else {
                    continue;
                };
                entries.extend(servers.iter().map(|(name, config)| {
                    ServerEntry::active(app_type, name, config.clone(), Some(project_path.as_str()))
                }));
            }
        }
        entries
    }

    /// Keys of the `projects` map, in document order.
    pub fn project_paths(&self) -> Vec<String> {
        self.root
            .get(PROJECTS)
            .and_then(Value::as_object)
            .map(|projects| projects.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn servers_map(&self, project_path: Option<&str>) -> Option<&Map<String, Value>> {
        let container = match project_path {
            None => &self.root,
            Some(project_path) => self
                .root
                .get(PROJECTS)?
                .as_object()?
                .get(project_path)?
                .as_object()?,
        };
        container.get(MCP_SERVERS)?.as_object()
    }
}

fn child_object<'a>(
    parent: &'a mut Map<String, Value>,
    key: &str,
    path: &Path,
) -> Result<&'a mut Map<String, Value>> {
    parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| {
            ManagerError::invalid_document(path, format!("expected '{key}' to be a JSON object"))
        })
}

/// Loads and saves the active config document of each app.
#[derive(Debug, Clone)]
pub struct ActiveConfigStore {
    files: JsonFileStore,
    paths: Arc<dyn PathResolver>,
}

impl ActiveConfigStore {
    pub fn new(files: JsonFileStore, paths: Arc<dyn PathResolver>) -> Self {
        Self { files, paths }
    }

    pub fn config_path(&self, app: AppType) -> PathBuf {
        self.paths.config_path(app)
    }

    pub fn exists(&self, app: AppType) -> bool {
        self.files.exists(&self.config_path(app))
    }

    pub fn load(&self, app: AppType) -> Result<Option<ActiveDocument>> {
        let path = self.config_path(app);
        match self.files.load(&path)? {
            Some(value) => ActiveDocument::from_value(path, value).map(Some),
            None => Ok(None),
        }
    }

    /// Load the document, or an empty one if the file does not exist yet.
    pub fn load_or_empty(&self, app: AppType) -> Result<ActiveDocument> {
        Ok(self
            .load(app)?
            .unwrap_or_else(|| ActiveDocument::empty(self.config_path(app))))
    }

    pub fn save(&self, document: &ActiveDocument) -> Result<()> {
        self.files.save(document.path(), &document.to_value())
    }

    /// All servers currently active for `app`.
    pub fn entries(&self, app: AppType) -> Result<Vec<ServerEntry>> {
        Ok(self
            .load(app)?
            .map(|document| document.entries(app))
            .unwrap_or_default())
    }
}
