//! `provctl config`: show and set configuration values.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;
use crate::domain::config::entries;
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value (`none` clears an optional setting)
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be read, validated or saved.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Set { key, value } => set_config(app, &key, &value),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let path = app.config_store.path()?;
    if app.is_json() {
        let doc = serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        });
        println!("{}", json::to_pretty(&doc)?);
        return Ok(ExitCode::SUCCESS);
    }
    app.output.kv("Config:", &path.display().to_string());
    if !app.output.quiet {
        println!();
    }
    for (key, value) in entries(&config) {
        app.output.kv(&format!("{key:<28}"), &value);
    }
    Ok(ExitCode::SUCCESS)
}

fn set_config(app: &AppContext, key: &str, value: &str) -> Result<ExitCode> {
    let config = config_service::set_value(&app.config_store, key, value)?;
    let stored = entries(&config)
        .into_iter()
        .find_map(|(k, v)| (k == key).then_some(v))
        .unwrap_or_else(|| value.to_string());
    if app.is_json() {
        let doc = serde_json::json!({ "key": key, "value": stored });
        println!("{}", json::to_pretty(&doc)?);
    } else {
        app.output.success(&format!("Set {key} = {stored}"));
    }
    Ok(ExitCode::SUCCESS)
}
