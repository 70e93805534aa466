//! Property-based tests for prefix handling and message sanitisation.

#![allow(clippy::expect_used)]

use proptest::prelude::*;

use provctl_cli::domain::Prefix;
use provctl_cli::domain::prefix::hostname;
use provctl_cli::domain::sanitize::sanitize;
use provctl_cli::domain::workflow::format_elapsed;

proptest! {
    /// Surrounding whitespace never reaches the backend.
    #[test]
    fn prop_prefix_is_trimmed(
        core in "[a-z][a-z0-9-]{0,20}",
        left in "[ \t]{0,3}",
        right in "[ \t\n]{0,3}",
    ) {
        let prefix = Prefix::parse(&format!("{left}{core}{right}")).expect("non-blank");
        prop_assert_eq!(prefix.as_str(), core.as_str());
    }

    /// Whitespace-only input is always rejected.
    #[test]
    fn prop_blank_prefix_rejected(blank in "[ \t\r\n]{0,10}") {
        prop_assert!(Prefix::parse(&blank).is_err());
    }

    /// The derived hostname is `{prefix}.{suffix}` however the suffix is dotted.
    #[test]
    fn prop_hostname_joins_with_single_dot(
        prefix in "[a-z0-9]{1,12}",
        suffix in "[a-z]{1,8}\\.[a-z]{2,5}",
        dots in "\\.{0,2}",
    ) {
        let host = hostname(&prefix, &format!("{dots}{suffix}"));
        prop_assert_eq!(host, format!("{prefix}.{suffix}"));
    }

    /// Sanitised text carries no escape or other control characters
    /// besides newline and tab.
    #[test]
    fn prop_sanitize_strips_controls(
        text in "\\PC{0,40}",
        ctrl in proptest::collection::vec(0u8..32, 0..6),
    ) {
        let mut input = text.clone();
        for c in ctrl {
            input.push(char::from(c));
            input.push_str("\x1b[31m");
        }
        let clean = sanitize(&input);
        prop_assert!(clean.chars().all(|c| !c.is_control() || c == '\n' || c == '\t'));
    }

    /// Printable text passes through untouched.
    #[test]
    fn prop_sanitize_keeps_printable(text in "[ -~]{0,60}") {
        prop_assert_eq!(sanitize(&text), text);
    }

    /// Elapsed rendering never shows more than two units.
    #[test]
    fn prop_elapsed_has_at_most_two_units(secs in 0u64..200_000) {
        let text = format_elapsed(std::time::Duration::from_secs(secs));
        prop_assert!(text.split(' ').count() <= 2, "{}", text);
    }
}
