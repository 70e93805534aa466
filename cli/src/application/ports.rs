//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure and presentation
//! must fulfill. This file imports only from `crate::domain` and the wire
//! types; never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::future::Future;
use std::path::PathBuf;

use anyhow::Result;
use provctl_common::{
    ClearCacheResponse, InstanceRecord, JobStatusReport, PingResponse, StartResponse,
    ValidationVerdict,
};

use crate::domain::{Banner, ClientConfig, Liveness, RosterEntry};

// ── Backend Port ──────────────────────────────────────────────────────────────

/// The provisioning backend's HTTP contract.
///
/// Futures are `Send` so liveness probes can run as independent tasks.
/// Any `Err` is a transport failure (network, HTTP status, malformed body);
/// legitimate rejections arrive as `Ok` payloads.
pub trait ProvisioningApi: Send + Sync {
    /// `GET /api/validate/{prefix}`: combined cache + liveness pre-flight check.
    fn validate(&self, prefix: &str) -> impl Future<Output = Result<ValidationVerdict>> + Send;
    /// `POST /api/start`: submit a provisioning job.
    fn start_job(&self, prefix: &str) -> impl Future<Output = Result<StartResponse>> + Send;
    /// `GET /api/status/{job_id}`: poll a job.
    fn job_status(&self, job_id: &str) -> impl Future<Output = Result<JobStatusReport>> + Send;
    /// `GET /api/instances`: completed instances, oldest first.
    fn instances(&self) -> impl Future<Output = Result<Vec<InstanceRecord>>> + Send;
    /// `GET /api/ping/{prefix}`: liveness probe of the derived hostname.
    fn ping(&self, prefix: &str) -> impl Future<Output = Result<PingResponse>> + Send;
    /// `POST /api/clear-cache`: purge the backend instance cache.
    fn clear_cache(&self) -> impl Future<Output = Result<ClearCacheResponse>> + Send;
}

// ── Presentation Ports ────────────────────────────────────────────────────────

/// The submit control: disabled with a state label while a run is active.
/// Sync trait, no async needed.
pub trait SubmitControl {
    /// Disable the control, show the spinner and display `label`.
    fn set_busy(&self, label: &str);
    /// Re-enable the control with its default label and hide the spinner.
    fn reset(&self);
}

/// Renders the single result banner.
pub trait ResultPresenter {
    /// Show `banner`, replacing any previous one.
    fn show(&self, banner: &Banner);
}

/// The rendered instance list.
///
/// Implementations are shared with probe tasks, hence `Send + Sync`.
pub trait RosterView: Send + Sync {
    /// Replace the whole view with `rows` (all `checking`).
    fn render(&self, rows: &[RosterEntry]);
    /// Replace the whole view with the empty-state placeholder.
    fn render_empty(&self);
    /// The instance list could not be fetched.
    fn render_error(&self, message: &str);
    /// The probe for the row at position `row` of the last render settled.
    /// Instance ids are not assumed unique.
    fn update_liveness(&self, row: usize, liveness: Liveness);
}

/// What the workflow controller calls after every terminal transition.
#[allow(async_fn_in_trait)]
pub trait RosterRefresh {
    /// Discard the current roster, re-fetch it and probe every instance.
    async fn refresh(&self);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when none is stored.
    fn load(&self) -> Result<ClientConfig>;
    /// Persist the configuration.
    fn save(&self, config: &ClientConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
