//! `provctl clear-cache`: purge the backend instance cache.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::ports::ResultPresenter;
use crate::application::services::cache_admin;
use crate::commands::banner_exit_code;
use crate::output::json::{self, BannerJson};

/// Run `provctl clear-cache`.
///
/// # Errors
///
/// Returns an error if the confirmation prompt fails or output fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    if !app.is_json() && !app.output.quiet {
        println!();
        println!("This clears the server's cache of known instances.");
        println!("Previously used prefixes may validate as free until it is rebuilt.");
        println!();
    }
    if !app.confirm("Continue?", true)? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let api = app.api()?;
    let banner = cache_admin::clear_cache(&api).await;
    if app.is_json() {
        println!(
            "{}",
            json::to_pretty(&BannerJson::new(&banner, app.server_url()))?
        );
    } else {
        app.ui().show(&banner);
    }
    Ok(banner_exit_code(banner.kind))
}
