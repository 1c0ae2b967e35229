//! Interactive toggle flow.
//!
//! Shows every known server as a checklist, pre-checked when enabled, and
//! applies only the entries whose state the user changed.

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use dialoguer::{Confirm, MultiSelect, theme::ColorfulTheme};

use mcpm_core::api::ManagerApi;
use mcpm_core::server::ServerEntry;

/// A single state change picked in the checklist.
#[derive(Debug, Clone, PartialEq)]
pub struct Toggle {
    pub server: ServerEntry,
    pub enable: bool,
}

/// Checklist-driven enable/disable session.
pub struct ToggleFlow<'a, W: Write = io::Stdout> {
    api: &'a ManagerApi,
    /// Output writer (for testing)
    writer: W,
    theme: ColorfulTheme,
}

impl<'a> ToggleFlow<'a, io::Stdout> {
    pub fn new(api: &'a ManagerApi) -> Self {
        Self {
            api,
            writer: io::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl<'a, W: Write> ToggleFlow<'a, W> {
    #[cfg(test)]
    pub fn with_writer(api: &'a ManagerApi, writer: W) -> Self {
        Self {
            api,
            writer,
            theme: ColorfulTheme::default(),
        }
    }

    /// Prompt for the desired states, confirm, then apply the changes.
    pub fn run(&mut self) -> Result<()> {
        self.print_header()?;

        let servers = self
            .api
            .list_all_servers()
            .into_result()
            .map_err(anyhow::Error::msg)?
            .unwrap_or_default();
        if servers.is_empty() {
            writeln!(self.writer, "No MCP servers configured.")?;
            return Ok(());
        }

        let labels: Vec<String> = servers.iter().map(label).collect();
        let defaults: Vec<bool> = servers.iter().map(|s| s.enabled).collect();
        let selections = MultiSelect::with_theme(&self.theme)
            .with_prompt("Enabled servers (space to toggle, enter to confirm)")
            .items(&labels)
            .defaults(&defaults)
            .interact()?;

        let toggles = plan_toggles(&servers, &selections);
        if toggles.is_empty() {
            writeln!(self.writer, "No changes.")?;
            return Ok(());
        }

        self.print_summary(&toggles)?;
        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt("Apply these changes?")
            .default(true)
            .interact()?;
        if !confirmed {
            writeln!(self.writer, "Cancelled.")?;
            return Ok(());
        }

        let failures = self.apply(&toggles)?;
        if failures > 0 {
            anyhow::bail!("{failures} of {} changes failed", toggles.len());
        }
        Ok(())
    }

    /// Apply each toggle independently; returns the number that failed.
    pub fn apply(&mut self, toggles: &[Toggle]) -> Result<usize> {
        let mut failures = 0;
        for toggle in toggles {
            let server = &toggle.server;
            let response = self.api.set_server_enabled(
                &server.name,
                server.app_type.as_str(),
                server.project_path.as_deref(),
                toggle.enable,
            );
            let verb = if toggle.enable { "Enabled" } else { "Disabled" };
            match response.error {
                None => writeln!(
                    self.writer,
                    "{} {verb} {}",
                    style("✓").green(),
                    label(server)
                )?,
                Some(error) => {
                    failures += 1;
                    writeln!(self.writer, "{} {}: {error}", style("✗").red(), label(server))?;
                }
            }
        }
        Ok(failures)
    }

    fn print_header(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style("  MCP Server Toggle").bold().cyan())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn print_summary(&mut self, toggles: &[Toggle]) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", style("  Summary").bold())?;
        writeln!(self.writer, "  ───────────────────────────")?;
        for toggle in toggles {
            let action = if toggle.enable {
                style("enable ").green()
            } else {
                style("disable").yellow()
            };
            writeln!(self.writer, "  {action}  {}", label(&toggle.server))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

/// Servers whose checked state differs from their current state.
pub fn plan_toggles(servers: &[ServerEntry], selections: &[usize]) -> Vec<Toggle> {
    servers
        .iter()
        .enumerate()
        .filter_map(|(index, server)| {
            let wanted = selections.contains(&index);
            (wanted != server.enabled).then(|| Toggle {
                server: server.clone(),
                enable: wanted,
            })
        })
        .collect()
}

fn label(server: &ServerEntry) -> String {
    match &server.project_name {
        Some(project) => format!("{} [{}: {project}]", server.name, server.app_type),
        None => format!("{} [{}]", server.name, server.app_type),
    }
}
