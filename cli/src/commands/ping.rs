//! `provctl ping <prefix>`: one liveness probe.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::application::services::instance_roster::probe;
use crate::domain::sanitize::sanitize;
use crate::domain::{Liveness, Prefix};
use crate::output::json;

/// Arguments for the ping command.
#[derive(Args)]
pub struct PingArgs {
    /// Hostname prefix of the instance
    pub prefix: String,
}

#[derive(Serialize)]
struct PingJson<'a> {
    prefix: &'a str,
    hostname: &'a str,
    liveness: Liveness,
}

/// Run `provctl ping`.
///
/// # Errors
///
/// Returns an error if the prefix is blank or the backend URL is invalid.
pub async fn run(app: &AppContext, args: &PingArgs) -> Result<ExitCode> {
    let prefix = Prefix::parse(&args.prefix)?;
    let hostname = prefix.hostname(&app.config.hostname.domain_suffix);
    let api = app.api()?;
    let liveness = probe(&api, prefix.as_str()).await;

    if app.is_json() {
        let doc = PingJson {
            prefix: prefix.as_str(),
            hostname: &hostname,
            liveness,
        };
        println!("{}", json::to_pretty(&doc)?);
    } else {
        let line = format!("{} is {}", sanitize(&hostname), liveness.as_str());
        match liveness {
            Liveness::Online => app.output.success(&line),
            Liveness::Offline | Liveness::Checking => app.output.warn(&line),
            Liveness::Error => app.output.error(&format!(
                "could not check {}",
                sanitize(&hostname)
            )),
        }
    }

    Ok(match liveness {
        Liveness::Error => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
