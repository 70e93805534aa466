//! The provisioning workflow as an explicit finite state machine.
//!
//! ```text
//! Idle → Validating → Submitting → Running → {Completed | Failed} → Idle
//!            │             │
//!            └──── Idle ◄──┘   (rejection or submission failure)
//! ```
//!
//! Every event has its own transition function returning the next
//! [`Effect`] for the caller to perform. Events that arrive in a phase that
//! no longer expects them return `None`, so a late or duplicated terminal
//! observation is a no-op. Nothing here performs I/O or reads a clock.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use provctl_common::{JobStatus, JobStatusReport, StartResponse, Timestamp};

use crate::domain::error::WorkflowError;
use crate::domain::prefix::Prefix;
use crate::domain::verdict::Verdict;

/// Label of the submit control while nothing is in flight.
pub const DEFAULT_LABEL: &str = "create instance";

// ── Types ─────────────────────────────────────────────────────────────────────

/// Workflow phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Submitting,
    Running,
    Completed,
    Failed,
}

impl Phase {
    /// Phases during which the submit control must stay disabled.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Validating | Self::Submitting | Self::Running)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        })
    }
}

/// Kind of result banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Failure,
}

/// A result banner: one line of text plus an optional log resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    /// Backend path of the job log, e.g. `/logs/j1.log`.
    pub log_file: Option<String>,
}

impl Banner {
    #[must_use]
    pub fn success(message: impl Into<String>, log_file: Option<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
            log_file,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>, log_file: Option<String>) -> Self {
        Self {
            kind: BannerKind::Failure,
            message: message.into(),
            log_file,
        }
    }
}

/// How a workflow run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The backend reported `completed`.
    Completed,
    /// The job failed, could not be submitted, or could not be tracked.
    Failed,
    /// The prefix was refused before submission.
    Rejected,
    /// The user walked away; the backend job (if any) keeps running.
    Cancelled,
}

/// What the caller has to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the pre-flight check for this prefix.
    Validate(Prefix),
    /// Submit the provisioning job.
    Submit(Prefix),
    /// Wait for the next poll tick, then request this job's status.
    Poll { job_id: String },
    /// Stop polling, reset the submit control, show the banner and, when
    /// asked, re-fetch the roster. Then call [`Workflow::finish`].
    Finish {
        banner: Banner,
        outcome: Outcome,
        refresh_roster: bool,
    },
}

impl Effect {
    fn finish(banner: Banner, outcome: Outcome, refresh_roster: bool) -> Self {
        Self::Finish {
            banner,
            outcome,
            refresh_roster,
        }
    }
}

// ── State machine ─────────────────────────────────────────────────────────────

/// Workflow state for one session: phase, the prefix being provisioned and
/// the single job reference.
#[derive(Debug, Clone, Default)]
pub struct Workflow {
    phase: Phase,
    prefix: Option<Prefix>,
    job_id: Option<String>,
    started_at: Option<Timestamp>,
}

impl Workflow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn prefix(&self) -> Option<&Prefix> {
        self.prefix.as_ref()
    }

    #[must_use]
    pub fn current_job(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    /// `true` while a run is in flight or a job reference is held.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.phase.is_active() || self.job_id.is_some()
    }

    fn ensure_idle(&self) -> Result<(), WorkflowError> {
        if self.is_busy() {
            return Err(WorkflowError::Busy {
                job_id: self.job_id.clone(),
            });
        }
        Ok(())
    }

    /// Form submission. Blank input finishes immediately without a network
    /// call.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Busy`] while another run is in flight.
    pub fn submit(&mut self, raw: &str) -> Result<Effect, WorkflowError> {
        self.ensure_idle()?;
        match Prefix::parse(raw) {
            Ok(prefix) => {
                self.phase = Phase::Validating;
                self.prefix = Some(prefix.clone());
                Ok(Effect::Validate(prefix))
            }
            Err(err) => Ok(Effect::finish(
                Banner::failure(err.to_string(), None),
                Outcome::Rejected,
                false,
            )),
        }
    }

    /// Re-attach to a job submitted earlier and go straight to polling.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Busy`] while another run is in flight, or
    /// [`WorkflowError::EmptyJobId`] for a blank id.
    pub fn attach(&mut self, job_id: &str) -> Result<Effect, WorkflowError> {
        self.ensure_idle()?;
        let job_id = job_id.trim();
        if job_id.is_empty() {
            return Err(WorkflowError::EmptyJobId);
        }
        self.phase = Phase::Running;
        self.job_id = Some(job_id.to_string());
        Ok(Effect::Poll {
            job_id: job_id.to_string(),
        })
    }

    /// Validation finished.
    pub fn on_verdict(&mut self, verdict: &Verdict) -> Option<Effect> {
        if self.phase != Phase::Validating {
            return None;
        }
        let prefix = self.prefix.clone()?;
        if let Some(reason) = verdict.failure_message() {
            *self = Self::default();
            return Some(Effect::finish(
                Banner::failure(reason, None),
                Outcome::Rejected,
                false,
            ));
        }
        self.phase = Phase::Submitting;
        Some(Effect::Submit(prefix))
    }

    /// The backend answered the submission.
    pub fn on_job_accepted(&mut self, response: StartResponse) -> Option<Effect> {
        if self.phase != Phase::Submitting {
            return None;
        }
        if let Some(job_id) = response.job_id {
            self.phase = Phase::Running;
            self.job_id = Some(job_id.clone());
            return Some(Effect::Poll { job_id });
        }
        let message = format!(
            "the server did not return a job id for {}",
            self.subject_prefix()
        );
        *self = Self::default();
        Some(Effect::finish(
            Banner::failure(message, None),
            Outcome::Failed,
            false,
        ))
    }

    /// The submission request itself failed.
    pub fn on_submit_failed(&mut self) -> Option<Effect> {
        if self.phase != Phase::Submitting {
            return None;
        }
        let message = format!(
            "could not submit the provisioning request for {}",
            self.subject_prefix()
        );
        *self = Self::default();
        Some(Effect::finish(
            Banner::failure(message, None),
            Outcome::Failed,
            false,
        ))
    }

    /// A poll tick observed a status.
    pub fn on_status(&mut self, report: JobStatusReport) -> Option<Effect> {
        if self.phase != Phase::Running {
            return None;
        }
        if report.started_at.is_some() {
            self.started_at = report.started_at;
        }
        match report.status {
            JobStatus::Completed => {
                self.phase = Phase::Completed;
                let message = match &self.prefix {
                    Some(prefix) => format!("instance {prefix} created"),
                    None => format!("job {} completed", self.job_label()),
                };
                Some(Effect::finish(
                    Banner::success(message, report.log_file),
                    Outcome::Completed,
                    true,
                ))
            }
            JobStatus::Failed => {
                self.phase = Phase::Failed;
                let subject = match &self.prefix {
                    Some(prefix) => format!("provisioning {prefix} failed"),
                    None => format!("job {} failed", self.job_label()),
                };
                let message = match report.failure_detail() {
                    Some(detail) => format!("{subject}: {detail}"),
                    None => subject,
                };
                Some(Effect::finish(
                    Banner::failure(message, report.log_file),
                    Outcome::Failed,
                    true,
                ))
            }
            JobStatus::Running | JobStatus::Unknown(_) => {
                self.job_id.clone().map(|job_id| Effect::Poll { job_id })
            }
        }
    }

    /// A status request failed. Tracking stops; the job may still finish.
    pub fn on_status_failed(&mut self) -> Option<Effect> {
        if self.phase != Phase::Running {
            return None;
        }
        self.phase = Phase::Failed;
        let message = format!("could not check the status of job {}", self.job_label());
        Some(Effect::finish(
            Banner::failure(message, None),
            Outcome::Failed,
            true,
        ))
    }

    /// The optional maximum poll duration elapsed.
    pub fn on_poll_timeout(&mut self, waited: Duration) -> Option<Effect> {
        if self.phase != Phase::Running {
            return None;
        }
        self.phase = Phase::Failed;
        let message = format!(
            "gave up waiting for job {} after {}",
            self.job_label(),
            format_elapsed(waited)
        );
        Some(Effect::finish(
            Banner::failure(message, None),
            Outcome::Failed,
            true,
        ))
    }

    /// Return to `Idle` and drop the job reference after a terminal effect.
    pub fn finish(&mut self) {
        *self = Self::default();
    }

    /// Abandon the current run. Returns whether anything was in flight.
    pub fn cancel(&mut self) -> bool {
        let was_busy = self.is_busy();
        *self = Self::default();
        was_busy
    }

    /// Submit-control label for the current phase, or `None` when the
    /// control should show [`DEFAULT_LABEL`].
    #[must_use]
    pub fn label(&self, now: DateTime<Utc>) -> Option<String> {
        match self.phase {
            Phase::Validating => Some(format!("validating {}...", self.subject_prefix())),
            Phase::Submitting => Some(format!("submitting {}...", self.subject_prefix())),
            Phase::Running => {
                let subject = match &self.prefix {
                    Some(prefix) => format!("provisioning {prefix}"),
                    None => format!("waiting for job {}", self.job_label()),
                };
                Some(match self.started_at {
                    Some(start) => {
                        let elapsed = (now - start.as_datetime()).to_std().unwrap_or_default();
                        format!("{subject}... {}", format_elapsed(elapsed))
                    }
                    None => format!("{subject}..."),
                })
            }
            Phase::Idle | Phase::Completed | Phase::Failed => None,
        }
    }

    fn subject_prefix(&self) -> &str {
        self.prefix.as_ref().map_or("the instance", Prefix::as_str)
    }

    fn job_label(&self) -> &str {
        self.job_id.as_deref().unwrap_or("?")
    }
}

/// Compact elapsed-time rendering: `42s`, `3m 05s`, `1h 02m`.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    match secs {
        0..60 => format!("{secs}s"),
        60..3600 => format!("{}m {:02}s", secs / 60, secs % 60),
        _ => format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60),
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
