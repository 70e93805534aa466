//! `provctl list`: the instance roster with liveness.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::app::AppContext;
use crate::application::ports::RosterView;
use crate::application::services::instance_roster::{InstanceRoster, ROSTER_UNAVAILABLE};
use crate::commands::interruptible;

/// Run `provctl list`.
///
/// # Errors
///
/// Returns an error if the backend URL is invalid or output fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let api = Arc::new(app.api()?);
    let view = Arc::new(app.roster_display());
    let roster = InstanceRoster::new(
        api,
        Arc::clone(&view),
        app.config.hostname.domain_suffix.clone(),
    );

    let code = match roster.reload().await {
        Ok(_) => {
            if interruptible(roster.settle()).await.is_none() {
                roster.cancel_probes();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            warn!(error = format!("{e:#}"), "instance list request failed");
            view.render_error(ROSTER_UNAVAILABLE);
            ExitCode::FAILURE
        }
    };
    view.finish()?;
    Ok(code)
}
