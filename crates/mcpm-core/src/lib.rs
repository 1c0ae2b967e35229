//! mcpm Core Library
//!
//! Enables, disables, moves and copies MCP server entries between the
//! config documents of Claude Code and Claude Desktop, keeping disabled
//! servers in a side store so they can be restored later.

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod fs;
pub mod orchestration;
pub mod server;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::api::{ApiResponse, ManagerApi};
    pub use crate::config::{
        ActiveConfigStore, ActiveDocument, DisabledStore, ManagerPaths, ManagerSettings,
        PathResolver,
    };
    pub use crate::context::AppContext;
    pub use crate::error::{ManagerError, Result};
    pub use crate::fs::JsonFileStore;
    pub use crate::orchestration::{ConfigPathInfo, ProjectInfo, ServerCoordinator};
    pub use crate::server::{ServerEntry, ServerKind};
    pub use crate::types::{AppType, ServerScope};
}
