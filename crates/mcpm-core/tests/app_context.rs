//! Context construction from `settings.toml`.

mod support;

use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use mcpm_core::config::PathResolver;
use mcpm_core::context::AppContext;
use mcpm_core::error::ManagerError;
use mcpm_core::types::AppType;

use support::{read_json, write_json};

fn write_settings(home: &Path, content: &str) {
    let dir = home.join(".mcp-manager");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("settings.toml"), content).unwrap();
}

fn backups_in(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.contains(".backup."))
        .collect()
}

#[test]
fn missing_settings_use_defaults() {
    let temp = TempDir::new().unwrap();

    let ctx = AppContext::new(temp.path().to_path_buf()).unwrap();

    assert!(ctx.settings().backup.enabled);
    assert_eq!(
        ctx.paths().config_path(AppType::ClaudeCode),
        temp.path().join(".claude.json")
    );
}

#[test]
fn settings_override_config_locations() {
    let temp = TempDir::new().unwrap();
    let custom = temp.path().join("elsewhere").join("desktop.json");
    write_settings(
        temp.path(),
        &format!("[paths]\nclaude_desktop = {:?}\n", custom.display().to_string()),
    );
    write_json(&custom, &json!({"mcpServers": {"foo": {"command": "node"}}}));

    let ctx = AppContext::new(temp.path().to_path_buf()).unwrap();
    ctx.coordinator()
        .disable(AppType::ClaudeDesktop, "foo", None)
        .unwrap();

    assert_eq!(read_json(&custom), json!({"mcpServers": {}}));
    assert_eq!(
        ctx.paths().config_path(AppType::ClaudeCode),
        temp.path().join(".claude.json")
    );
}

#[test]
fn enabled_backups_keep_a_dated_copy() {
    let temp = TempDir::new().unwrap();
    let ctx = AppContext::new(temp.path().to_path_buf()).unwrap();
    let config = ctx.paths().config_path(AppType::ClaudeCode);
    write_json(&config, &json!({"mcpServers": {"foo": {}}}));

    ctx.coordinator()
        .disable(AppType::ClaudeCode, "foo", None)
        .unwrap();

    let backups = backups_in(temp.path());
    assert_eq!(backups.len(), 1);
    assert!(backups[0].starts_with(".claude.json.backup."));
    let saved = read_json(&temp.path().join(&backups[0]));
    assert_eq!(saved, json!({"mcpServers": {"foo": {}}}));
}

#[test]
fn disabled_backups_leave_no_copies() {
    let temp = TempDir::new().unwrap();
    write_settings(temp.path(), "[backup]\nenabled = false\n");
    let ctx = AppContext::new(temp.path().to_path_buf()).unwrap();
    let config = ctx.paths().config_path(AppType::ClaudeCode);
    write_json(&config, &json!({"mcpServers": {"foo": {}}}));

    ctx.coordinator()
        .disable(AppType::ClaudeCode, "foo", None)
        .unwrap();

    assert!(backups_in(temp.path()).is_empty());
    assert!(backups_in(&temp.path().join(".mcp-manager")).is_empty());
}

#[test]
fn malformed_settings_are_rejected() {
    let temp = TempDir::new().unwrap();
    write_settings(temp.path(), "[backup]\nenabled = \"sometimes\"\n");

    let err = AppContext::new(temp.path().to_path_buf()).unwrap_err();

    assert!(matches!(err, ManagerError::Settings { .. }));
}

#[test]
fn relative_override_is_rejected() {
    let temp = TempDir::new().unwrap();
    write_settings(temp.path(), "[paths]\nclaude_code = \"relative/config.json\"\n");

    let err = AppContext::new(temp.path().to_path_buf()).unwrap_err();

    assert!(matches!(err, ManagerError::Settings { .. }));
}
