//! JSON output helpers and the JSON implementations of the presentation ports.
//!
//! In `--json` mode nothing is printed while the workflow runs; the command
//! prints one document at the end built from what the ports collected.

use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{ResultPresenter, RosterView, SubmitControl};
use crate::domain::{Banner, BannerKind, Liveness, RosterEntry};
use crate::output::log_link;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Serialize any value as pretty JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn to_pretty(value: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}

/// Wire shape of a result banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerJson {
    pub kind: &'static str,
    pub message: String,
    pub log_url: Option<String>,
}

impl BannerJson {
    #[must_use]
    pub fn new(banner: &Banner, base_url: &str) -> Self {
        Self {
            kind: match banner.kind {
                BannerKind::Success => "success",
                BannerKind::Failure => "failure",
            },
            message: banner.message.clone(),
            log_url: banner.log_file.as_deref().map(|f| log_link(base_url, f)),
        }
    }
}

/// Collects the last banner; the submit control is invisible in JSON mode.
#[derive(Debug, Default)]
pub struct JsonUi {
    base_url: String,
    banner: Mutex<Option<BannerJson>>,
}

impl JsonUi {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            banner: Mutex::new(None),
        }
    }

    /// The banner shown last, if any.
    #[must_use]
    pub fn banner(&self) -> Option<BannerJson> {
        self.banner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SubmitControl for JsonUi {
    fn set_busy(&self, _label: &str) {}

    fn reset(&self) {}
}

impl ResultPresenter for JsonUi {
    fn show(&self, banner: &Banner) {
        *self.banner.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(BannerJson::new(banner, &self.base_url));
    }
}

/// Collects roster rows and probe results.
#[derive(Debug, Default)]
pub struct JsonRoster {
    state: Mutex<RosterState>,
}

#[derive(Debug, Default, Clone)]
struct RosterState {
    rows: Vec<RosterEntry>,
    error: Option<String>,
}

/// Wire shape of the roster document.
#[derive(Debug, Clone, Serialize)]
pub struct RosterJson {
    pub instances: Vec<RosterEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JsonRoster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current rows.
    #[must_use]
    pub fn snapshot(&self) -> RosterJson {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        RosterJson {
            instances: state.rows.clone(),
            error: state.error.clone(),
        }
    }
}

impl RosterView for JsonRoster {
    fn render(&self, rows: &[RosterEntry]) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.rows = rows.to_vec();
        state.error = None;
    }

    fn render_empty(&self) {
        self.render(&[]);
    }

    fn render_error(&self, message: &str) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.rows.clear();
        state.error = Some(message.to_string());
    }

    fn update_liveness(&self, row: usize, liveness: Liveness) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = state.rows.get_mut(row) {
            entry.liveness = liveness;
        }
    }
}
