//! `provctl watch <job-id>`: follow a job submitted earlier.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::commands::create::{Target, drive};

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Job id printed when the job was submitted
    pub job_id: String,
}

/// Run `provctl watch`.
///
/// # Errors
///
/// Returns an error if the job id is blank or the backend URL is invalid.
pub async fn run(app: &AppContext, args: &WatchArgs) -> Result<ExitCode> {
    drive(app, Target::Watch(&args.job_id)).await
}
