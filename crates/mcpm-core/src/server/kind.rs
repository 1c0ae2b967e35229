//! Heuristic runtime classification from a server's `command`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Best-effort runtime label; informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerKind {
    Nodejs,
    Python,
    Binary,
}

const NODEJS_MARKERS: &[&str] = &["node", ".js"];
const PYTHON_MARKERS: &[&str] = &["python", ".py"];

impl ServerKind {
    /// Classify by case-insensitive substring match on `config.command`.
    pub fn classify(config: &Value) -> Self {
        let command = config
            .get("command")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Self::classify_command(command)
    }

    pub fn classify_command(command: &str) -> Self {
        let command = command.to_lowercase();
        if NODEJS_MARKERS.iter().any(|marker| command.contains(*marker)) {
            ServerKind::Nodejs
        } else if PYTHON_MARKERS.iter().any(|marker| command.contains(*marker)) {
            ServerKind::Python
        } else {
            ServerKind::Binary
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerKind::Nodejs => "nodejs",
            ServerKind::Python => "python",
            ServerKind::Binary => "binary",
        }
    }
}
