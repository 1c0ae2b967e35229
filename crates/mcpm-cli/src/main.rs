//! mcpm - MCP server toggle manager
//!
//! Usage:
//!   mcpm                                  # List every server
//!   mcpm disable claude-code fs           # Park a server in the disabled store
//!   mcpm enable claude-code fs -p ~/app   # Restore a project server
//!   mcpm move fs --from global --to ~/app # Move between scopes
//!   mcpm toggle                           # Interactive checklist
//!   mcpm open claude-desktop              # Open the config in the default editor

mod interactive;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcpm_core::api::{ApiResponse, ManagerApi};
use mcpm_core::context::AppContext;
use mcpm_core::orchestration::{ConfigPathInfo, ProjectInfo};
use mcpm_core::server::ServerEntry;
use mcpm_core::types::{AppType, ServerScope};

use crate::interactive::ToggleFlow;

#[derive(Parser)]
#[command(name = "mcpm")]
#[command(about = "Enable, disable and move MCP servers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List active and disabled servers
    #[command(alias = "ls")]
    List {
        /// Only show servers of this app (claude-code, claude-desktop)
        #[arg(long, short)]
        app: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Restore a disabled server into the app's config
    Enable {
        /// App type (claude-code, claude-desktop)
        app: String,
        /// Server name
        name: String,
        /// Project path for project-scoped servers
        #[arg(long, short)]
        project: Option<String>,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Move a server out of the app's config into the disabled store
    Disable {
        /// App type (claude-code, claude-desktop)
        app: String,
        /// Server name
        name: String,
        /// Project path for project-scoped servers
        #[arg(long, short)]
        project: Option<String>,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Move a Claude Code server between global scope and projects
    #[command(alias = "mv")]
    Move {
        /// Server name
        name: String,
        /// Source location: "global" or a project path
        #[arg(long, default_value = "global")]
        from: String,
        /// Target location: "global" or a project path
        #[arg(long)]
        to: String,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Copy a Claude Code server from one project to another
    #[command(alias = "cp")]
    Copy {
        /// Server name
        name: String,
        /// Source project path
        from: String,
        /// Target project path
        to: String,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List Claude Code projects
    Projects {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show where an app's config lives
    Info {
        /// App type (claude-code, claude-desktop)
        app: String,
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Open an app's config file with the system's default application
    Open {
        /// App type (claude-code, claude-desktop)
        app: String,
    },

    /// Pick enabled servers from an interactive checklist
    Toggle,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcpm=info,mcpm_core=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let api = AppContext::with_defaults()?.api();

    let command = cli.command.unwrap_or(Commands::List {
        app: None,
        format: OutputFormat::Table,
    });
    run_cli(&api, command)
}

fn run_cli(api: &ManagerApi, command: Commands) -> Result<()> {
    match command {
        Commands::List { app, format } => run_list(api, app.as_deref(), format),
        Commands::Enable {
            app,
            name,
            project,
            format,
        } => {
            let response = api.set_server_enabled(&name, &app, project.as_deref(), true);
            let message = format!("✓ Enabled {}", describe(&app, &name, project.as_deref()));
            finish(response, format, &message)
        }
        Commands::Disable {
            app,
            name,
            project,
            format,
        } => {
            let response = api.set_server_enabled(&name, &app, project.as_deref(), false);
            let message = format!("✓ Disabled {}", describe(&app, &name, project.as_deref()));
            finish(response, format, &message)
        }
        Commands::Move {
            name,
            from,
            to,
            format,
        } => {
            let (from_scope, from_project) = parse_location(&from);
            let (to_scope, to_project) = parse_location(&to);
            let response = api.move_server(
                &name,
                from_scope.as_str(),
                from_project,
                to_scope.as_str(),
                to_project,
            );
            finish(response, format, &format!("✓ Moved '{name}' from {from} to {to}"))
        }
        Commands::Copy {
            name,
            from,
            to,
            format,
        } => {
            let response = api.copy_server(&name, &from, &to);
            finish(response, format, &format!("✓ Copied '{name}' from {from} to {to}"))
        }
        Commands::Projects { format } => run_projects(api, format),
        Commands::Info { app, format } => run_info(api, &app, format),
        Commands::Open { app } => run_open(api, &app),
        Commands::Toggle => ToggleFlow::new(api).run(),
    }
}

/// `"global"` selects the top-level map; anything else is a project path.
fn parse_location(location: &str) -> (ServerScope, Option<&str>) {
    if location == ServerScope::Global.as_str() {
        (ServerScope::Global, None)
    } else {
        (ServerScope::Project, Some(location))
    }
}

fn describe(app: &str, name: &str, project: Option<&str>) -> String {
    match project {
        Some(project) => format!("{app} server '{name}' in {project}"),
        None => format!("{app} server '{name}'"),
    }
}

/// Print a mutation result and turn a failed response into an error.
fn finish<T: Serialize>(response: ApiResponse<T>, format: OutputFormat, message: &str) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => {
            if response.success {
                println!("{message}");
            }
        }
    }
    response.into_result().map_err(anyhow::Error::msg)?;
    Ok(())
}

fn run_list(api: &ManagerApi, app: Option<&str>, format: OutputFormat) -> Result<()> {
    let filter = app.map(str::parse::<AppType>).transpose()?;
    let mut response = api.list_all_servers();
    if let (Some(filter), Some(servers)) = (filter, response.data.as_mut()) {
        servers.retain(|server| server.app_type == filter);
    }

    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => {
            if let Some(servers) = &response.data {
                print_server_table(servers);
            }
        }
    }
    response.into_result().map_err(anyhow::Error::msg)?;
    Ok(())
}

fn run_projects(api: &ManagerApi, format: OutputFormat) -> Result<()> {
    let response = api.list_projects();
    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => {
            if let Some(projects) = &response.data {
                print_project_table(projects);
            }
        }
    }
    response.into_result().map_err(anyhow::Error::msg)?;
    Ok(())
}

fn run_info(api: &ManagerApi, app: &str, format: OutputFormat) -> Result<()> {
    let response = api.get_config_path_info(app);
    match format {
        OutputFormat::Json => print_json(&response)?,
        OutputFormat::Table => {
            if let Some(info) = &response.data {
                print_info(app, info);
            }
        }
    }
    response.into_result().map_err(anyhow::Error::msg)?;
    Ok(())
}

fn run_open(api: &ManagerApi, app: &str) -> Result<()> {
    let path = config_file_to_open(api, app)?;
    opener::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
    println!("Opened {}", path.display());
    Ok(())
}

/// Resolve an app's config file, refusing paths that do not exist yet.
fn config_file_to_open(api: &ManagerApi, app: &str) -> Result<PathBuf> {
    let info = api
        .get_config_path_info(app)
        .into_result()
        .map_err(anyhow::Error::msg)?
        .with_context(|| format!("no config path for {app}"))?;
    if !info.exists {
        anyhow::bail!("config file does not exist: {}", info.path.display());
    }
    Ok(info.path)
}

fn print_server_table(servers: &[ServerEntry]) {
    if servers.is_empty() {
        println!("No MCP servers configured.");
        return;
    }

    println!(
        "  {:<2} {:<24} {:<16} {:<8} {:<20} Location",
        "", "Name", "App", "Type", "Scope"
    );
    println!("  {}", "-".repeat(90));
    for server in servers {
        let location = server.project_path.as_deref().unwrap_or("-");
        let scope = match &server.project_name {
            Some(project) => format!("project ({project})"),
            None => server.scope.to_string(),
        };
        println!(
            "  {:<2} {:<24} {:<16} {:<8} {:<20} {}",
            state_symbol(server.enabled),
            server.name,
            server.app_type,
            server.kind.as_str(),
            scope,
            location
        );
    }

    let disabled = servers.iter().filter(|s| !s.enabled).count();
    println!();
    println!(
        "Summary: {} servers, {} disabled",
        servers.len(),
        disabled
    );
}

fn print_project_table(projects: &[ProjectInfo]) {
    if projects.is_empty() {
        println!("No Claude Code projects found.");
        return;
    }

    println!("  {:<24} Path", "Name");
    println!("  {}", "-".repeat(70));
    for project in projects {
        println!("  {:<24} {}", project.name, project.path);
    }
}

fn print_info(app: &str, info: &ConfigPathInfo) {
    println!("App:    {app}");
    println!("Config: {}", info.path.display());
    println!(
        "Status: {}",
        if info.exists { "present" } else { "missing" }
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn state_symbol(enabled: bool) -> &'static str {
    if enabled { "✓" } else { "○" }
}

#[cfg(test)]
mod tests {
    use mcpm_core::config::settings::{BackupSettings, ManagerSettings};
    use tempfile::TempDir;

    use super::*;

    fn api_in(temp: &TempDir) -> ManagerApi {
        let settings = ManagerSettings {
            backup: BackupSettings { enabled: false },
            ..ManagerSettings::default()
        };
        AppContext::with_settings(temp.path().to_path_buf(), settings).api()
    }

    #[test]
    fn test_parse_location_global() {
        assert_eq!(parse_location("global"), (ServerScope::Global, None));
    }

    #[test]
    fn test_parse_location_project() {
        assert_eq!(
            parse_location("/work/app"),
            (ServerScope::Project, Some("/work/app"))
        );
    }

    #[test]
    fn test_describe_mentions_project() {
        assert_eq!(
            describe("claude-code", "fs", Some("/a")),
            "claude-code server 'fs' in /a"
        );
        assert_eq!(describe("claude-desktop", "fs", None), "claude-desktop server 'fs'");
    }

    #[test]
    fn test_finish_propagates_failure() {
        let response: ApiResponse<()> = ApiResponse::err("boom");
        let err = finish(response, OutputFormat::Table, "unused").unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_cli_parses_move() {
        let cli = Cli::try_parse_from(["mcpm", "move", "fs", "--to", "/a"]).unwrap();
        match cli.command {
            Some(Commands::Move { name, from, to, .. }) => {
                assert_eq!(name, "fs");
                assert_eq!(from, "global");
                assert_eq!(to, "/a");
            }
            _ => panic!("expected move command"),
        }
    }

    #[test]
    fn test_open_rejects_unknown_app() {
        let temp = TempDir::new().unwrap();
        let err = config_file_to_open(&api_in(&temp), "cursor").unwrap_err();
        assert_eq!(err.to_string(), "unknown app type: cursor");
    }

    #[test]
    fn test_open_requires_existing_config() {
        let temp = TempDir::new().unwrap();
        let err = config_file_to_open(&api_in(&temp), "claude-code").unwrap_err();
        assert!(err.to_string().starts_with("config file does not exist"));
    }

    #[test]
    fn test_open_resolves_config_path() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join(".claude.json");
        std::fs::write(&config, "{}").unwrap();

        let path = config_file_to_open(&api_in(&temp), "claude-code").unwrap();

        assert_eq!(path, config);
    }

    #[test]
    fn test_cli_parses_open() {
        let cli = Cli::try_parse_from(["mcpm", "open", "claude-desktop"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Open { app }) if app == "claude-desktop"));
    }
}
