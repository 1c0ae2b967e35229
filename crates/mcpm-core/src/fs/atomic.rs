//! Crash-safe JSON document persistence.
//!
//! Saves go through a sibling `<path>.tmp` file that is re-read and parsed
//! before being renamed over the target. The rename is the only step that
//! touches the target path, so a failed save leaves the previous document in
//! place. A dated backup copy is taken before each overwrite when enabled.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ManagerError, Result};

/// Loads and saves JSON documents with backup-before-overwrite and atomic replace.
#[derive(Debug, Clone, Copy)]
pub struct JsonFileStore {
    backups: bool,
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonFileStore {
    /// Store with dated backups enabled.
    pub fn new() -> Self {
        Self { backups: true }
    }

    pub fn with_backups(backups: bool) -> Self {
        Self { backups }
    }

    pub fn backups_enabled(&self) -> bool {
        self.backups
    }

    pub fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Load a JSON document.
    ///
    /// Returns `Ok(None)` when the file does not exist; any other read failure
    /// or malformed content is an error.
    pub fn load(&self, path: &Path) -> Result<Option<Value>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(ManagerError::io("read", path, err)),
        };
        let value = serde_json::from_slice(&bytes).map_err(|e| ManagerError::parse(path, e))?;
        Ok(Some(value))
    }

    /// Load a JSON document and deserialize it into `T`.
    pub fn load_as<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        match self.load(path)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| ManagerError::invalid_document(path, e.to_string())),
            None => Ok(None),
        }
    }

    /// Save a JSON document, replacing the target atomically.
    pub fn save(&self, path: &Path, document: &Value) -> Result<()> {
        if self.backups && path.exists() {
            create_backup(path);
        }

        let bytes = serde_json::to_vec_pretty(document).map_err(|e| unserializable(path, e))?;
        write_verified(path, &bytes)?;
        tracing::debug!(path = %path.display(), "saved JSON document");
        Ok(())
    }

    /// Serialize `document` and save it atomically.
    pub fn save_as<T: Serialize>(&self, path: &Path, document: &T) -> Result<()> {
        let value = serde_json::to_value(document).map_err(|e| unserializable(path, e))?;
        self.save(path, &value)
    }
}

fn unserializable(path: &Path, source: serde_json::Error) -> ManagerError {
    ManagerError::invalid_document(path, format!("cannot serialize document: {source}"))
}

/// Path of the dated backup taken before overwriting `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let date = chrono::Utc::now().format("%Y-%m-%d");
    with_suffix(path, &format!(".backup.{date}"))
}

/// Sibling temporary path used while writing `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    with_suffix(path, ".tmp")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Best-effort backup; failures are logged and never block the save.
fn create_backup(path: &Path) {
    let backup = backup_path(path);
    match fs::copy(path, &backup) {
        Ok(_) => tracing::debug!(backup = %backup.display(), "created backup"),
        Err(err) => tracing::warn!(
            path = %path.display(),
            error = %err,
            "backup failed, continuing with save"
        ),
    }
}

fn write_verified(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path = temp_path(path);
    if let Err(err) = commit(path, &tmp_path, bytes) {
        if let Err(cleanup) = fs::remove_file(&tmp_path)
            && cleanup.kind() != ErrorKind::NotFound
        {
            tracing::debug!(
                tmp = %tmp_path.display(),
                error = %cleanup,
                "failed to remove temporary file"
            );
        }
        return Err(err);
    }
    Ok(())
}

fn commit(path: &Path, tmp_path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| ManagerError::io("create directory", parent, e))?;
    }

    fs::write(tmp_path, bytes).map_err(|e| ManagerError::io("write", tmp_path, e))?;

    let written = fs::read(tmp_path).map_err(|e| ManagerError::io("read back", tmp_path, e))?;
    serde_json::from_slice::<Value>(&written).map_err(|e| ManagerError::parse(tmp_path, e))?;

    fs::rename(tmp_path, path).map_err(|e| ManagerError::io("rename", tmp_path, e))?;
    Ok(())
}
