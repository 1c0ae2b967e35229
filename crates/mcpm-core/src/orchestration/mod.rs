//! Orchestration of server state transitions across config documents.

pub mod coordinator;

pub use coordinator::{ConfigPathInfo, ProjectInfo, ServerCoordinator};
