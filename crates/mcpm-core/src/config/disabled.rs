//! Side store for servers taken out of an active config document.
//!
//! One `<app>-disabled.json` per app under the manager directory, holding an
//! ordered `disabledServers` list. Entries are unique by
//! [`unique_key`](crate::server::unique_key); adding an entry with an existing
//! key replaces it.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::paths::PathResolver;
use crate::error::{ManagerError, Result};
use crate::fs::JsonFileStore;
use crate::server::{DisabledEntry, ServerEntry, unique_key};
use crate::types::AppType;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisabledDocument {
    #[serde(default)]
    pub disabled_servers: Vec<DisabledEntry>,
}

#[derive(Debug, Clone)]
pub struct DisabledStore {
    files: JsonFileStore,
    paths: Arc<dyn PathResolver>,
}

impl DisabledStore {
    pub fn new(files: JsonFileStore, paths: Arc<dyn PathResolver>) -> Self {
        Self { files, paths }
    }

    pub fn store_path(&self, app: AppType) -> PathBuf {
        self.paths.disabled_store_path(app)
    }

    /// All disabled servers of `app`; empty when the store does not exist.
    pub fn load_all(&self, app: AppType) -> Result<Vec<ServerEntry>> {
        Ok(self
            .load_entries(app)?
            .into_iter()
            .map(|entry| ServerEntry::from_disabled_entry(entry, app))
            .collect())
    }

    pub fn contains(&self, app: AppType, name: &str, project_path: Option<&str>) -> Result<bool> {
        let key = unique_key(app, name, project_path);
        Ok(self
            .load_entries(app)?
            .iter()
            .any(|entry| entry_key(app, entry) == key))
    }

    /// Insert `server`, replacing any entry with the same unique key.
    ///
    /// The timestamp of a previously disabled server is kept; otherwise the
    /// entry is stamped now.
    pub fn add(&self, app: AppType, server: &ServerEntry) -> Result<()> {
        let key = server.unique_key();
        let mut entries = self.load_entries(app)?;
        entries.retain(|entry| entry_key(app, entry) != key);

        let mut stored = server.to_disabled_entry();
        if let Some(disabled_at) = server.disabled_at {
            stored.disabled_at = disabled_at;
        }
        entries.push(stored);

        self.save_entries(app, entries)?;
        tracing::debug!(key = %key, "added disabled server");
        Ok(())
    }

    /// Remove and return the entry for `name` at `project_path`.
    pub fn remove(
        &self,
        app: AppType,
        name: &str,
        project_path: Option<&str>,
    ) -> Result<ServerEntry> {
        let key = unique_key(app, name, project_path);
        let mut entries = self.load_entries(app)?;
        let Some(index) = entries.iter().position(|entry| entry_key(app, entry) == key) else {
            return Err(ManagerError::NotFound(format!(
                "disabled server not found: {name} ({})",
                project_path.unwrap_or("global")
            )));
        };
        let removed = entries.remove(index);
        entries.retain(|entry| entry_key(app, entry) != key);

        self.save_entries(app, entries)?;
        tracing::debug!(key = %key, "removed disabled server");
        Ok(ServerEntry::from_disabled_entry(removed, app))
    }

    fn load_entries(&self, app: AppType) -> Result<Vec<DisabledEntry>> {
        let document: Option<DisabledDocument> = self.files.load_as(&self.store_path(app))?;
        Ok(document.unwrap_or_default().disabled_servers)
    }

    fn save_entries(&self, app: AppType, entries: Vec<DisabledEntry>) -> Result<()> {
        let document = DisabledDocument {
            disabled_servers: entries,
        };
        self.files.save_as(&self.store_path(app), &document)
    }
}

fn entry_key(app: AppType, entry: &DisabledEntry) -> String {
    unique_key(app, &entry.name, entry.project_path.as_deref())
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use tempfile::TempDir;

    use super::*;
    use crate::config::paths::ManagerPaths;

    fn store(temp: &TempDir) -> DisabledStore {
        let paths = Arc::new(ManagerPaths::new(temp.path().to_path_buf()));
        DisabledStore::new(JsonFileStore::with_backups(false), paths)
    }

    fn server(name: &str, project: Option<&str>) -> ServerEntry {
        ServerEntry::disabled(AppType::ClaudeCode, name, json!({"command": "node"}), project)
    }

    #[test]
    fn load_all_without_store_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(store(&temp).load_all(AppType::ClaudeCode).unwrap().is_empty());
    }

    #[test]
    fn add_persists_document_shape() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        store.add(AppType::ClaudeCode, &server("fs", Some("/w/app"))).unwrap();

        let raw: Value = serde_json::from_slice(
            &std::fs::read(store.store_path(AppType::ClaudeCode)).unwrap(),
        )
        .unwrap();
        let entry = &raw["disabledServers"][0];
        assert_eq!(entry["name"], "fs");
        assert_eq!(entry["projectPath"], "/w/app");
        assert_eq!(entry["projectName"], "app");
        assert!(entry["disabledAt"].is_string());
    }

    #[test]
    fn add_replaces_entry_with_same_key() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.add(AppType::ClaudeCode, &server("fs", None)).unwrap();
        store.add(AppType::ClaudeCode, &server("fs", Some("/a"))).unwrap();

        let replacement = ServerEntry::disabled(
            AppType::ClaudeCode,
            "fs",
            json!({"command": "python"}),
            None,
        );
        store.add(AppType::ClaudeCode, &replacement).unwrap();

        let all = store.load_all(AppType::ClaudeCode).unwrap();
        assert_eq!(all.len(), 2);
        let global = all.iter().find(|s| s.project_path.is_none()).unwrap();
        assert_eq!(global.config, json!({"command": "python"}));
    }

    #[test]
    fn rewriting_keeps_existing_timestamps() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.add(AppType::ClaudeCode, &server("first", None)).unwrap();
        let before = store.load_all(AppType::ClaudeCode).unwrap()[0].disabled_at;

        store.add(AppType::ClaudeCode, &server("second", None)).unwrap();

        let after = store.load_all(AppType::ClaudeCode).unwrap();
        assert_eq!(after[0].name, "first");
        assert_eq!(after[0].disabled_at, before);
    }

    #[test]
    fn remove_returns_entry_and_persists() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.add(AppType::ClaudeCode, &server("fs", Some("/a"))).unwrap();
        store.add(AppType::ClaudeCode, &server("db", None)).unwrap();

        let removed = store.remove(AppType::ClaudeCode, "fs", Some("/a")).unwrap();

        assert_eq!(removed.name, "fs");
        assert!(!removed.enabled);
        let remaining = store.load_all(AppType::ClaudeCode).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "db");
    }

    #[test]
    fn remove_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.add(AppType::ClaudeCode, &server("fs", Some("/a"))).unwrap();

        let err = store.remove(AppType::ClaudeCode, "fs", None).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.load_all(AppType::ClaudeCode).unwrap().len(), 1);
    }

    #[test]
    fn stores_are_separate_per_app() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store.add(AppType::ClaudeCode, &server("fs", None)).unwrap();

        assert!(store.load_all(AppType::ClaudeDesktop).unwrap().is_empty());
        assert!(store.contains(AppType::ClaudeCode, "fs", None).unwrap());
        assert!(!store.contains(AppType::ClaudeDesktop, "fs", None).unwrap());
    }

    #[test]
    fn document_without_list_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let path = store.store_path(AppType::ClaudeCode);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{}").unwrap();

        assert!(store.load_all(AppType::ClaudeCode).unwrap().is_empty());
    }
}
