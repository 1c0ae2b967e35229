//! String-typed boundary consumed by presentation layers.
//!
//! Every operation returns an [`ApiResponse`] instead of an error: the
//! caller always gets a success flag plus either data or an error message.
//! App types and scope names are parsed before any file is touched.

use serde::Serialize;

use crate::error::{ManagerError, Result};
use crate::orchestration::{ConfigPathInfo, ProjectInfo, ServerCoordinator};
use crate::server::ServerEntry;
use crate::types::{AppType, ServerScope};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn into_result(self) -> std::result::Result<Option<T>, String> {
        match self.error {
            Some(message) => Err(message),
            None => Ok(self.data),
        }
    }
}

/// Boundary API over an explicitly constructed [`ServerCoordinator`].
#[derive(Debug, Clone)]
pub struct ManagerApi {
    coordinator: ServerCoordinator,
}

impl ManagerApi {
    pub fn new(coordinator: ServerCoordinator) -> Self {
        Self { coordinator }
    }

    pub fn coordinator(&self) -> &ServerCoordinator {
        &self.coordinator
    }

    pub fn list_all_servers(&self) -> ApiResponse<Vec<ServerEntry>> {
        respond("list_all_servers", self.coordinator.list_all())
    }

    pub fn set_server_enabled(
        &self,
        name: &str,
        app_type: &str,
        project_path: Option<&str>,
        enabled: bool,
    ) -> ApiResponse<()> {
        let result = app_type.parse::<AppType>().and_then(|app| {
            self.coordinator
                .set_enabled(app, name, project_path, enabled)
        });
        respond("set_server_enabled", result)
    }

    /// Move between scopes. Project paths are required for project ends.
    pub fn move_server(
        &self,
        name: &str,
        from_scope: &str,
        from_project: Option<&str>,
        to_scope: &str,
        to_project: Option<&str>,
    ) -> ApiResponse<()> {
        let result = resolve_location(from_scope, from_project).and_then(|from| {
            let to = resolve_location(to_scope, to_project)?;
            self.coordinator.move_server(name, from, to)
        });
        respond("move_server", result)
    }

    pub fn copy_server(&self, name: &str, from_project: &str, to_project: &str) -> ApiResponse<()> {
        respond(
            "copy_server",
            self.coordinator
                .copy_project_to_project(name, from_project, to_project),
        )
    }

    pub fn get_config_path_info(&self, app_type: &str) -> ApiResponse<ConfigPathInfo> {
        let result = app_type
            .parse::<AppType>()
            .map(|app| self.coordinator.config_path_info(app));
        respond("get_config_path_info", result)
    }

    pub fn list_projects(&self) -> ApiResponse<Vec<ProjectInfo>> {
        respond("list_projects", self.coordinator.list_projects())
    }
}

fn resolve_location<'a>(scope: &str, project: Option<&'a str>) -> Result<Option<&'a str>> {
    match (scope.parse::<ServerScope>()?, project) {
        (ServerScope::Global, _) => Ok(None),
        (ServerScope::Project, Some(project)) => Ok(Some(project)),
        (ServerScope::Project, None) => Err(ManagerError::InvalidMove(
            "project scope requires a project path".to_string(),
        )),
    }
}

fn respond<T>(operation: &'static str, result: Result<T>) -> ApiResponse<T> {
    match result {
        Ok(data) => ApiResponse::ok(data),
        Err(err) => {
            tracing::error!(operation, error = %err, "operation failed");
            ApiResponse::err(err.to_string())
        }
    }
}
