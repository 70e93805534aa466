//! Application service: the provisioning workflow controller.
//!
//! Drives [`Workflow`] transitions against the backend: validate, submit,
//! poll until terminal, then reconcile the submit control, the result banner
//! and the instance roster. Owns the only recurring timer.

use std::time::Duration;

use chrono::Utc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::application::ports::{ProvisioningApi, ResultPresenter, RosterRefresh, SubmitControl};
use crate::application::services::prefix_validator::PrefixValidator;
use crate::domain::config::ClientConfig;
use crate::domain::workflow::{Banner, Effect, Outcome, Workflow};
use crate::domain::WorkflowError;

/// Knobs the controller reads from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub poll_interval: Duration,
    /// `None` polls until a terminal status.
    pub max_poll_duration: Option<Duration>,
    pub domain_suffix: String,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for WorkflowSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            poll_interval: config.polling.interval(),
            max_poll_duration: config.polling.max_duration(),
            domain_suffix: config.hostname.domain_suffix.clone(),
        }
    }
}

/// Fixed-period poll timer. At most one interval exists at a time.
#[derive(Debug, Default)]
pub struct PollTimer {
    interval: Option<Interval>,
    started: Option<Instant>,
}

impl PollTimer {
    /// Start ticking every `period`, first tick one period from now.
    /// Replaces any running interval.
    pub fn start(&mut self, period: Duration) {
        let now = Instant::now();
        let mut interval = tokio::time::interval_at(now + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
        self.started = Some(now);
    }

    /// Stop ticking. Safe to call when nothing is running.
    pub fn stop(&mut self) {
        self.interval = None;
        self.started = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// Time since [`start`](Self::start), or zero when stopped.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.as_ref().map_or(Duration::ZERO, Instant::elapsed)
    }

    /// Wait for the next tick. Returns `false` immediately when stopped.
    pub async fn tick(&mut self) -> bool {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
                true
            }
            None => false,
        }
    }
}

/// One controller per session. Holds the single job reference and the poll
/// timer; nothing outside it touches either.
pub struct WorkflowController<'a, A, U, R> {
    api: &'a A,
    ui: &'a U,
    roster: &'a R,
    settings: WorkflowSettings,
    workflow: Workflow,
    timer: PollTimer,
    settled: Option<Outcome>,
}

impl<'a, A, U, R> WorkflowController<'a, A, U, R>
where
    A: ProvisioningApi,
    U: SubmitControl + ResultPresenter,
    R: RosterRefresh,
{
    #[must_use]
    pub fn new(api: &'a A, ui: &'a U, roster: &'a R, settings: WorkflowSettings) -> Self {
        Self {
            api,
            ui,
            roster,
            settings,
            workflow: Workflow::new(),
            timer: PollTimer::default(),
            settled: None,
        }
    }

    /// Run the full workflow for raw prefix input until a terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Busy`] when a run is already in flight.
    pub async fn start(&mut self, raw_prefix: &str) -> Result<Outcome, WorkflowError> {
        let effect = self.workflow.submit(raw_prefix)?;
        self.settled = None;
        self.sync_label();
        Ok(self.drive(effect).await)
    }

    /// Poll an already-submitted job until a terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Busy`] when a run is already in flight, or
    /// [`WorkflowError::EmptyJobId`] for a blank id.
    pub async fn watch(&mut self, job_id: &str) -> Result<Outcome, WorkflowError> {
        let effect = self.workflow.attach(job_id)?;
        self.settled = None;
        self.sync_label();
        Ok(self.drive(effect).await)
    }

    /// Abandon the current run: stop the timer, forget the job and re-enable
    /// the submit control. The backend job is left alone.
    ///
    /// Returns whether anything was in flight.
    pub fn cancel(&mut self) -> bool {
        self.timer.stop();
        let was_busy = self.workflow.cancel();
        if was_busy {
            info!("workflow cancelled; the backend job keeps running");
            self.ui.reset();
        }
        was_busy
    }

    /// The job currently being tracked.
    #[must_use]
    pub fn current_job(&self) -> Option<&str> {
        self.workflow.current_job()
    }

    /// Outcome of the last run once its banner is shown. Set before the
    /// roster refresh, so it survives an interrupted refresh.
    #[must_use]
    pub fn settled_outcome(&self) -> Option<Outcome> {
        self.settled
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.timer.is_running()
    }

    async fn drive(&mut self, mut effect: Effect) -> Outcome {
        loop {
            let from = self.workflow.phase();
            let next = match effect {
                Effect::Validate(prefix) => {
                    let verdict = PrefixValidator::new(self.api, &self.settings.domain_suffix)
                        .validate_prefix(&prefix)
                        .await;
                    self.workflow.on_verdict(&verdict)
                }
                Effect::Submit(prefix) => match self.api.start_job(prefix.as_str()).await {
                    Ok(response) => {
                        debug!(%prefix, job_id = ?response.job_id, "job submitted");
                        self.workflow.on_job_accepted(response)
                    }
                    Err(e) => {
                        warn!(%prefix, error = format!("{e:#}"), "submit request failed");
                        self.workflow.on_submit_failed()
                    }
                },
                Effect::Poll { job_id } => self.poll_once(&job_id).await,
                Effect::Finish {
                    banner,
                    outcome,
                    refresh_roster,
                } => {
                    info!(?outcome, message = %banner.message, "workflow finished");
                    self.settled = Some(outcome);
                    self.finish(&banner, refresh_roster).await;
                    return outcome;
                }
            };
            let to = self.workflow.phase();
            if from != to {
                debug!(%from, %to, "workflow transition");
            }
            self.sync_label();
            effect = match next {
                Some(effect) => effect,
                None => {
                    // Every reachable phase yields an effect; treat a stray
                    // `None` as an abandoned run.
                    self.cancel();
                    return Outcome::Cancelled;
                }
            };
        }
    }

    async fn poll_once(&mut self, job_id: &str) -> Option<Effect> {
        if !self.timer.is_running() {
            debug!(job_id, period = ?self.settings.poll_interval, "polling started");
            self.timer.start(self.settings.poll_interval);
        }
        self.timer.tick().await;
        if let Some(max) = self.settings.max_poll_duration {
            let waited = self.timer.elapsed();
            if waited >= max {
                warn!(job_id, ?waited, "maximum poll duration reached");
                return self.workflow.on_poll_timeout(waited);
            }
        }
        match self.api.job_status(job_id).await {
            Ok(report) => {
                debug!(job_id, status = ?report.status, "poll tick");
                self.workflow.on_status(report)
            }
            Err(e) => {
                warn!(job_id, error = format!("{e:#}"), "status request failed");
                self.workflow.on_status_failed()
            }
        }
    }

    async fn finish(&mut self, banner: &Banner, refresh_roster: bool) {
        self.timer.stop();
        self.ui.reset();
        self.ui.show(banner);
        self.workflow.finish();
        if refresh_roster {
            self.roster.refresh().await;
        }
    }

    // Terminal phases leave the control alone; `finish` re-enables it.
    fn sync_label(&self) {
        if let Some(label) = self.workflow.label(Utc::now()) {
            self.ui.set_busy(&label);
        }
    }
}
