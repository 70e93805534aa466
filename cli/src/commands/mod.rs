//! Command implementations

pub mod clear_cache;
pub mod config;
pub mod create;
pub mod list;
pub mod ping;
pub mod status;
pub mod validate;
pub mod version;
pub mod watch;

use std::future::Future;
use std::process::ExitCode;

use crate::domain::{BannerKind, Outcome};

/// Exit status for an interrupted run (128 + SIGINT).
pub const EXIT_INTERRUPTED: u8 = 130;

/// Wait for `future`, or return `None` if the user presses Ctrl-C first.
/// The future is dropped on interrupt.
pub async fn interruptible<F: Future>(future: F) -> Option<F::Output> {
    tokio::select! {
        output = future => Some(output),
        Ok(()) = tokio::signal::ctrl_c() => None,
    }
}

/// Process exit code for a workflow outcome.
#[must_use]
pub fn exit_code(outcome: Outcome) -> ExitCode {
    match outcome {
        Outcome::Completed => ExitCode::SUCCESS,
        Outcome::Cancelled => ExitCode::from(EXIT_INTERRUPTED),
        Outcome::Failed | Outcome::Rejected => ExitCode::FAILURE,
    }
}

/// Process exit code for a one-shot banner.
#[must_use]
pub fn banner_exit_code(kind: BannerKind) -> ExitCode {
    match kind {
        BannerKind::Success => ExitCode::SUCCESS,
        BannerKind::Failure => ExitCode::FAILURE,
    }
}

/// Lowercase name used for outcomes in JSON output.
#[must_use]
pub fn outcome_name(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Completed => "completed",
        Outcome::Failed => "failed",
        Outcome::Rejected => "rejected",
        Outcome::Cancelled => "cancelled",
    }
}
