//! Progress indicators using indicatif

#![allow(clippy::expect_used)] // Templates are compile-time constants

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICKS: &[&str] = &[
    "⠁", "⠂", "⠄", "⡀", "⡈", "⡐", "⡠", "⣀", "⣁", "⣂", "⣄", "⣌", "⣔", "⣤", "⣥", "⣦", "⣮", "⣶",
    "⣷", "⣿", "⡿", "⠿", "⢟", "⠟", "⡛", "⠛", "⠫", "⢋", "⠋", "⠍", "⡉", "⠉", "⠑", "⠡", "⢁",
];

/// Create a spinner for indeterminate progress.
///
/// # Panics
///
/// Panics if the spinner template string is invalid (it is a compile-time constant and will not panic).
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style("{spinner:.cyan} {msg}"));
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// A roster row: the row text followed by a spinner until the probe settles.
#[must_use]
pub fn pending_row(row: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style("  {msg} {spinner:.dim}"));
    pb.set_message(row.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Replace a pending row with its settled text.
pub fn settle_row(pb: &ProgressBar, row: &str) {
    pb.set_style(ProgressStyle::default_spinner().template("  {msg}").expect("valid template"));
    pb.finish_with_message(row.to_string());
}

fn spinner_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_strings(TICKS)
        .template(template)
        .expect("valid template")
}
