//! Terminal-safe rendering of untrusted text.
//!
//! Prefixes and backend messages end up in banners and roster rows. Escape
//! sequences in them could rewrite the terminal (cursor moves, fake
//! hyperlinks, title changes), so they are stripped along with every other
//! control character except newline and tab.

#![allow(clippy::expect_used)] // Patterns are compile-time constants

use std::sync::LazyLock;

use regex::Regex;

// CSI (`ESC [ ... final`), OSC (`ESC ] ... BEL|ST`) and two-byte escapes.
static ESCAPES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)?|\x1b[@-~]")
        .expect("valid escape pattern")
});

/// Strip escape sequences and control characters from `text`.
#[must_use]
pub fn sanitize(text: &str) -> String {
    ESCAPES
        .replace_all(text, "")
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}
