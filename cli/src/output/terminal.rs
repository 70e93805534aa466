//! Terminal implementations of the presentation ports.
//!
//! The submit control is an indicatif spinner on a TTY and a plain step line
//! otherwise. Roster rows are spinners that settle as their probes finish.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use indicatif::{MultiProgress, ProgressBar};
use owo_colors::OwoColorize as _;

use crate::application::ports::{ResultPresenter, RosterView, SubmitControl};
use crate::domain::roster::EMPTY_ROSTER;
use crate::domain::sanitize::sanitize;
use crate::domain::{Banner, BannerKind, Liveness, RosterEntry};
use crate::output::{OutputContext, Styles, log_link, progress};

// ── Submit control + banner ───────────────────────────────────────────────────

pub struct TerminalUi<'a> {
    ctx: &'a OutputContext,
    base_url: String,
    spinner: RefCell<Option<ProgressBar>>,
    last_step: RefCell<Option<String>>,
}

impl<'a> TerminalUi<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext, base_url: impl Into<String>) -> Self {
        Self {
            ctx,
            base_url: base_url.into(),
            spinner: RefCell::new(None),
            last_step: RefCell::new(None),
        }
    }
}

impl SubmitControl for TerminalUi<'_> {
    fn set_busy(&self, label: &str) {
        let label = sanitize(label);
        if self.ctx.show_progress() {
            let mut spinner = self.spinner.borrow_mut();
            match spinner.as_ref() {
                Some(pb) => pb.set_message(label),
                None => *spinner = Some(progress::spinner(&label)),
            }
            return;
        }
        if self.ctx.quiet {
            return;
        }
        // The running label carries an elapsed counter; print one line per step.
        let step = label.split("...").next().unwrap_or_default().to_string();
        let mut last = self.last_step.borrow_mut();
        if last.as_deref() != Some(step.as_str()) {
            println!("  {} {label}", "→".style(self.ctx.styles.info));
            *last = Some(step);
        }
    }

    fn reset(&self) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            pb.finish_and_clear();
        }
        self.last_step.borrow_mut().take();
    }
}

impl ResultPresenter for TerminalUi<'_> {
    fn show(&self, banner: &Banner) {
        let message = sanitize(&banner.message);
        let link = banner
            .log_file
            .as_deref()
            .map(|file| sanitize(&log_link(&self.base_url, file)));
        match banner.kind {
            BannerKind::Success => {
                self.ctx.success(&message);
                if let Some(link) = link {
                    self.ctx.kv("  log:", &link.style(self.ctx.styles.link).to_string());
                }
            }
            BannerKind::Failure => {
                self.ctx.error(&message);
                if let Some(link) = link {
                    eprintln!(
                        "    {}  {}",
                        "log:".style(self.ctx.styles.dim),
                        link.style(self.ctx.styles.link)
                    );
                }
            }
        }
    }
}

// ── Roster ────────────────────────────────────────────────────────────────────

/// Terminal roster. Shared with probe tasks, so all state sits behind a lock.
pub struct TerminalRoster {
    ctx: OutputContext,
    base_url: String,
    multi: MultiProgress,
    state: Mutex<RosterState>,
}

#[derive(Default)]
struct RosterState {
    rows: Vec<RosterEntry>,
    bars: HashMap<usize, ProgressBar>,
}

impl TerminalRoster {
    #[must_use]
    pub fn new(ctx: OutputContext, base_url: impl Into<String>) -> Self {
        Self {
            ctx,
            base_url: base_url.into(),
            multi: MultiProgress::new(),
            state: Mutex::new(RosterState::default()),
        }
    }

    fn live(&self) -> bool {
        self.ctx.show_progress()
    }

    fn state(&self) -> MutexGuard<'_, RosterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flush the view once probes have settled. On a TTY this settles any
    /// row still spinning; otherwise the whole table is printed now.
    pub fn finish(&self) {
        let mut state = self.state();
        if self.live() {
            let RosterState { rows, bars } = &mut *state;
            for (index, row) in rows.iter().enumerate() {
                if let Some(bar) = bars.remove(&index) {
                    progress::settle_row(&bar, &format_row(&self.ctx.styles, row, &self.base_url));
                }
            }
            return;
        }
        if self.ctx.quiet || state.rows.is_empty() {
            return;
        }
        println!("{}", header(&self.ctx.styles));
        for row in &state.rows {
            println!("  {}", format_row(&self.ctx.styles, row, &self.base_url));
        }
    }
}

impl RosterView for TerminalRoster {
    fn render(&self, rows: &[RosterEntry]) {
        let mut state = self.state();
        for (_, bar) in state.bars.drain() {
            bar.finish_and_clear();
        }
        state.rows = rows.to_vec();
        if !self.live() {
            return;
        }
        println!("{}", header(&self.ctx.styles));
        for (index, row) in rows.iter().enumerate() {
            let bar = self.multi.add(progress::pending_row(&format_row(
                &self.ctx.styles,
                row,
                &self.base_url,
            )));
            state.bars.insert(index, bar);
        }
    }

    fn render_empty(&self) {
        self.render(&[]);
        self.ctx.info(EMPTY_ROSTER);
    }

    fn render_error(&self, message: &str) {
        self.render(&[]);
        self.ctx.error(&sanitize(message));
    }

    fn update_liveness(&self, row: usize, liveness: Liveness) {
        let mut state = self.state();
        let RosterState { rows, bars } = &mut *state;
        let Some(entry) = rows.get_mut(row) else {
            return;
        };
        entry.liveness = liveness;
        if let Some(bar) = bars.remove(&row) {
            progress::settle_row(&bar, &format_row(&self.ctx.styles, entry, &self.base_url));
        }
    }
}

fn header(styles: &Styles) -> String {
    let text = format!(
        "  {:<16} {:<32} {:<9} {:<23} {}",
        "PREFIX", "HOSTNAME", "STATUS", "COMPLETED", "LOG"
    );
    text.style(styles.header).to_string()
}

/// One roster line. Backend strings are sanitized before display.
#[must_use]
pub fn format_row(styles: &Styles, row: &RosterEntry, base_url: &str) -> String {
    let completed = row
        .completed_at
        .map_or_else(|| "-".to_string(), |at| at.to_string());
    let log = row
        .log_file
        .as_deref()
        .map_or_else(|| "-".to_string(), |file| sanitize(&log_link(base_url, file)));
    format!(
        "{:<16} {:<32} {} {:<23} {}",
        sanitize(&row.prefix),
        sanitize(&row.hostname),
        format!("{:<9}", row.liveness.as_str()).style(styles.liveness(row.liveness)),
        completed,
        log.style(styles.dim)
    )
}
