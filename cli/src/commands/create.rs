//! `provctl create <prefix>`: validate, submit, poll, then refresh the roster.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::instance_roster::InstanceRoster;
use crate::application::services::workflow::WorkflowController;
use crate::commands::{exit_code, interruptible, outcome_name};
use crate::domain::Outcome;
use crate::output::{RosterDisplay, Ui, json};

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Hostname prefix of the new instance
    pub prefix: String,
}

/// What the workflow controller is asked to do.
pub(crate) enum Target<'a> {
    Start(&'a str),
    Watch(&'a str),
}

/// Run `provctl create`.
///
/// # Errors
///
/// Returns an error if the backend URL is invalid or output fails.
pub async fn run(app: &AppContext, args: &CreateArgs) -> Result<ExitCode> {
    drive(app, Target::Start(&args.prefix)).await
}

/// Drive one workflow run to a terminal state, then let the roster refresh
/// it triggered settle. Ctrl-C abandons the run locally.
pub(crate) async fn drive(app: &AppContext, target: Target<'_>) -> Result<ExitCode> {
    let api = Arc::new(app.api()?);
    let view = Arc::new(app.roster_display());
    let roster = InstanceRoster::new(
        Arc::clone(&api),
        Arc::clone(&view),
        app.config.hostname.domain_suffix.clone(),
    );
    let ui = app.ui();
    let mut controller = WorkflowController::new(api.as_ref(), &ui, &roster, app.settings());

    let interrupted = match target {
        Target::Start(prefix) => interruptible(controller.start(prefix)).await,
        Target::Watch(job_id) => interruptible(controller.watch(job_id)).await,
    };
    let outcome = match (interrupted, controller.settled_outcome()) {
        (Some(result), _) => result?,
        // Interrupted during the roster refresh: the job already finished.
        (None, Some(outcome)) => {
            roster.cancel_probes();
            outcome
        }
        (None, None) => {
            let job_id = controller.current_job().map(str::to_owned);
            controller.cancel();
            report_cancelled(app, job_id.as_deref());
            Outcome::Cancelled
        }
    };

    if outcome != Outcome::Cancelled && interruptible(roster.settle()).await.is_none() {
        roster.cancel_probes();
    }

    if app.is_json() {
        print_json(outcome, &ui, &view)?;
    } else {
        view.finish()?;
    }
    Ok(exit_code(outcome))
}

fn report_cancelled(app: &AppContext, job_id: Option<&str>) {
    if app.is_json() {
        return;
    }
    match job_id {
        Some(id) => {
            app.output.warn(&format!(
                "stopped watching job {id}; it keeps running on the server"
            ));
            app.output.info(&format!("Resume with: provctl watch {id}"));
        }
        None => app.output.warn("cancelled"),
    }
}

fn print_json(outcome: Outcome, ui: &Ui<'_>, view: &RosterDisplay) -> Result<()> {
    let banner = match ui {
        Ui::Json(ui) => ui.banner(),
        Ui::Terminal(_) => None,
    };
    let instances = match view {
        RosterDisplay::Json(view) => Some(view.snapshot()),
        RosterDisplay::Terminal(_) => None,
    };
    let doc = serde_json::json!({
        "outcome": outcome_name(outcome),
        "banner": banner,
        "roster": instances,
    });
    println!("{}", json::to_pretty(&doc)?);
    Ok(())
}
