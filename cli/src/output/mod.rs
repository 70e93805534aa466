//! Output formatting module

pub mod json;
pub mod progress;
pub mod styles;
pub mod terminal;

use console::Term;
use owo_colors::OwoColorize as _;
pub use json::{JsonRoster, JsonUi};
pub use styles::Styles;
pub use terminal::{TerminalRoster, TerminalUi};

use crate::application::ports::{ResultPresenter, RosterView, SubmitControl};
use crate::domain::{Banner, Liveness, RosterEntry};

/// Output context carrying styling and terminal state.
#[derive(Clone)]
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Absolute URL of a job log. `log_file` is a backend path such as
/// `/logs/j1.log`; absolute URLs are passed through.
#[must_use]
pub fn log_link(base_url: &str, log_file: &str) -> String {
    let file = log_file.trim();
    if file.starts_with("http://") || file.starts_with("https://") {
        return file.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        file.trim_start_matches('/')
    )
}

// ── Mode dispatch ─────────────────────────────────────────────────────────────

/// Submit control and result presenter for the selected output mode.
pub enum Ui<'a> {
    Terminal(TerminalUi<'a>),
    Json(JsonUi),
}

impl SubmitControl for Ui<'_> {
    fn set_busy(&self, label: &str) {
        match self {
            Self::Terminal(ui) => ui.set_busy(label),
            Self::Json(ui) => ui.set_busy(label),
        }
    }

    fn reset(&self) {
        match self {
            Self::Terminal(ui) => ui.reset(),
            Self::Json(ui) => ui.reset(),
        }
    }
}

impl ResultPresenter for Ui<'_> {
    fn show(&self, banner: &Banner) {
        match self {
            Self::Terminal(ui) => ui.show(banner),
            Self::Json(ui) => ui.show(banner),
        }
    }
}

/// Roster view for the selected output mode.
pub enum RosterDisplay {
    Terminal(TerminalRoster),
    Json(JsonRoster),
}

impl RosterDisplay {
    /// Flush terminal output, or print the collected JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn finish(&self) -> anyhow::Result<()> {
        match self {
            Self::Terminal(view) => view.finish(),
            Self::Json(view) => println!("{}", json::to_pretty(&view.snapshot())?),
        }
        Ok(())
    }
}

impl RosterView for RosterDisplay {
    fn render(&self, rows: &[RosterEntry]) {
        match self {
            Self::Terminal(view) => view.render(rows),
            Self::Json(view) => view.render(rows),
        }
    }

    fn render_empty(&self) {
        match self {
            Self::Terminal(view) => view.render_empty(),
            Self::Json(view) => view.render_empty(),
        }
    }

    fn render_error(&self, message: &str) {
        match self {
            Self::Terminal(view) => view.render_error(message),
            Self::Json(view) => view.render_error(message),
        }
    }

    fn update_liveness(&self, row: usize, liveness: Liveness) {
        match self {
            Self::Terminal(view) => view.update_liveness(row, liveness),
            Self::Json(view) => view.update_liveness(row, liveness),
        }
    }
}
