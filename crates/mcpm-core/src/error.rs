//! Error taxonomy for configuration and server operations.

use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, ManagerError>;

#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// Read, write, rename or directory creation failed for a reason other
    /// than the file being absent.
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON, either on load or when verifying a freshly written
    /// temporary file.
    #[error("failed to parse JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed JSON with the wrong shape.
    #[error("invalid document {}: {reason}", path.display())]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{app} does not support project-scoped servers")]
    UnsupportedScope { app: String },

    #[error("{0}")]
    InvalidMove(String),

    #[error("invalid scope '{0}'. Valid values: global, project")]
    InvalidScope(String),

    #[error("unknown app type: {0}")]
    UnknownAppType(String),

    #[error("invalid settings file {}: {reason}", path.display())]
    Settings { path: PathBuf, reason: String },
}

impl ManagerError {
    pub(crate) fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        ManagerError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(path: &Path, source: serde_json::Error) -> Self {
        ManagerError::Parse {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid_document(path: &Path, reason: impl Into<String>) -> Self {
        ManagerError::InvalidDocument {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// True for storage-level failures. Parse failures count as I/O failures.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            ManagerError::Io { .. } | ManagerError::Parse { .. } | ManagerError::InvalidDocument { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ManagerError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_are_io_errors() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ManagerError::parse(Path::new("/tmp/x.json"), source);
        assert!(err.is_io());
        assert!(!err.is_not_found());
    }

    #[test]
    fn io_error_message_names_path_and_action() {
        let err = ManagerError::io(
            "rename",
            Path::new("/tmp/config.json.tmp"),
            std::io::Error::other("boom"),
        );
        let message = err.to_string();
        assert!(message.contains("rename"));
        assert!(message.contains("/tmp/config.json.tmp"));
    }
}
