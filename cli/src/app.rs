//! Application context: unified state passed to every command handler.
//!
//! Built once per invocation from the global flags and the stored
//! configuration. Commands get their backend client and presentation ports
//! from here, so the output mode is decided in exactly one place.

use anyhow::Result;

use crate::application::services::config_service;
use crate::application::services::workflow::WorkflowSettings;
use crate::domain::config::ClientConfig;
use crate::infra::config::YamlConfigStore;
use crate::infra::http::HttpApi;
use crate::output::{
    JsonRoster, JsonUi, OutputContext, RosterDisplay, TerminalRoster, TerminalUi, Ui,
};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `PROVCTL_YES` env vars).
    pub yes: bool,
    /// One-off backend URL, overriding `server.url`.
    pub server: Option<String>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Persistent configuration store.
    pub config_store: YamlConfigStore,
    /// Effective configuration, including the `--server` override.
    pub config: ClientConfig,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `PROVCTL_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the
    /// `--server` override is not a valid URL.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("PROVCTL_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config_store = YamlConfigStore::default();
        let config = config_service::resolve(&config_store, flags.behaviour.server.as_deref())?;

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config_store,
            config,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Backend base URL from the effective configuration.
    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.config.server.url
    }

    /// HTTP client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the server URL is invalid.
    pub fn api(&self) -> Result<HttpApi> {
        HttpApi::new(self.server_url(), self.config.server.request_timeout())
    }

    /// Workflow knobs from the effective configuration.
    #[must_use]
    pub fn settings(&self) -> WorkflowSettings {
        WorkflowSettings::from(&self.config)
    }

    /// Submit control and result presenter for the current output mode.
    #[must_use]
    pub fn ui(&self) -> Ui<'_> {
        match self.mode {
            OutputMode::Human => Ui::Terminal(TerminalUi::new(&self.output, self.server_url())),
            OutputMode::Json => Ui::Json(JsonUi::new(self.server_url())),
        }
    }

    /// Roster view for the current output mode.
    #[must_use]
    pub fn roster_display(&self) -> RosterDisplay {
        match self.mode {
            OutputMode::Human => RosterDisplay::Terminal(TerminalRoster::new(
                self.output.clone(),
                self.server_url(),
            )),
            OutputMode::Json => RosterDisplay::Json(JsonRoster::new()),
        }
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `PROVCTL_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
