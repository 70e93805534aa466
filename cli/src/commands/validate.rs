//! `provctl validate <prefix>`: pre-flight check only.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::services::prefix_validator::PrefixValidator;
use crate::domain::Verdict;
use crate::domain::sanitize::sanitize;
use crate::output::json;

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Hostname prefix to check
    pub prefix: String,
}

#[derive(Serialize)]
struct VerdictJson<'a> {
    prefix: &'a str,
    valid: bool,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    hostname: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Run `provctl validate`.
///
/// # Errors
///
/// Returns an error if the backend URL is invalid or output fails.
pub async fn run(app: &AppContext, args: &ValidateArgs) -> Result<ExitCode> {
    let api = app.api()?;
    let verdict = PrefixValidator::new(&api, &app.config.hostname.domain_suffix)
        .validate(&args.prefix)
        .await;

    if app.is_json() {
        let doc = VerdictJson {
            prefix: args.prefix.trim(),
            valid: verdict.is_valid(),
            code: verdict.code(),
            hostname: match &verdict {
                Verdict::Valid { hostname } => Some(hostname.as_str()),
                _ => None,
            },
            message: verdict.failure_message(),
        };
        println!("{}", json::to_pretty(&doc)?);
    } else {
        match &verdict {
            Verdict::Valid { hostname } => app.output.success(&format!(
                "{} is available ({})",
                sanitize(args.prefix.trim()),
                sanitize(hostname)
            )),
            _ => app
                .output
                .error(&sanitize(&verdict.failure_message().unwrap_or_default())),
        }
    }

    Ok(if verdict.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
