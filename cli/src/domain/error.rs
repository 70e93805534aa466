//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Workflow errors ───────────────────────────────────────────────────────────

/// Errors raised by the provisioning workflow before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("please enter a prefix")]
    EmptyPrefix,

    #[error("please enter a job id")]
    EmptyJobId,

    #[error("a provisioning job is already in progress{}", job_suffix(.job_id))]
    Busy { job_id: Option<String> },
}

#[allow(clippy::ref_option)]
fn job_suffix(job_id: &Option<String>) -> String {
    job_id
        .as_deref()
        .map(|id| format!(" (job {id})"))
        .unwrap_or_default()
}

// ── API errors ────────────────────────────────────────────────────────────────

/// Errors reported by the HTTP client beyond plain transport failures.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("invalid server URL '{0}'")]
    InvalidUrl(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: String,
        value: String,
        hint: String,
    },
}
