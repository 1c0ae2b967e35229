//! Configuration documents and their locations
//!
//! - `active`: the applications' live config documents
//! - `disabled`: the manager's side store of disabled servers
//! - `paths`: where those documents live
//! - `settings`: the manager's own `settings.toml`

pub mod active;
pub mod disabled;
pub mod paths;
pub mod settings;

pub use active::{ActiveConfigStore, ActiveDocument};
pub use disabled::{DisabledDocument, DisabledStore};
pub use paths::{ManagerPaths, PathResolver};
pub use settings::ManagerSettings;
