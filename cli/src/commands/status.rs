//! `provctl status <job-id>`: one status request.

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use provctl_common::{JobStatus, JobStatusReport};
use serde::Serialize;

use crate::app::AppContext;
use crate::application::ports::ProvisioningApi;
use crate::domain::WorkflowError;
use crate::domain::sanitize::sanitize;
use crate::domain::workflow::format_elapsed;
use crate::output::{json, log_link};

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Job id printed when the job was submitted
    pub job_id: String,
}

#[derive(Serialize)]
struct StatusJson<'a> {
    job_id: &'a str,
    #[serde(flatten)]
    report: &'a JobStatusReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_url: Option<String>,
}

/// Run `provctl status`.
///
/// # Errors
///
/// Returns an error if the job id is blank or the status request fails.
pub async fn run(app: &AppContext, args: &StatusArgs) -> Result<ExitCode> {
    let job_id = args.job_id.trim();
    if job_id.is_empty() {
        return Err(WorkflowError::EmptyJobId.into());
    }
    let api = app.api()?;
    let report = api
        .job_status(job_id)
        .await
        .with_context(|| format!("could not check the status of job {job_id}"))?;
    let log_url = report
        .log_file
        .as_deref()
        .map(|file| log_link(app.server_url(), file));

    if app.is_json() {
        let doc = StatusJson {
            job_id,
            report: &report,
            log_url,
        };
        println!("{}", json::to_pretty(&doc)?);
    } else {
        let status = String::from(report.status.clone());
        app.output.kv("Job:", &sanitize(job_id));
        app.output.kv("Status:", &sanitize(&status));
        if let Some(started) = report.started_at {
            let elapsed = (Utc::now() - started.as_datetime())
                .to_std()
                .unwrap_or_default();
            app.output.kv(
                "Started:",
                &format!("{started} ({} ago)", format_elapsed(elapsed)),
            );
        }
        if let Some(detail) = report.failure_detail() {
            app.output.kv("Errors:", &sanitize(&detail));
        }
        if let Some(url) = log_url {
            app.output.kv("Log:", &sanitize(&url));
        }
    }

    Ok(match report.status {
        JobStatus::Failed => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
