//! Pre-flight validation verdicts.
//!
//! The backend answers a single combined question: is the prefix in the
//! instance cache, or does its hostname already answer liveness probes? The
//! cache check short-circuits the ping check server-side, so a verdict
//! carries at most one reason. Transport failures are kept apart from real
//! rejections so "prefix taken" is never reported for a dead server.

use provctl_common::{ValidationVerdict, VerdictReason};

use crate::domain::prefix::Prefix;

/// Shown when validation could not be completed at all.
pub const VALIDATION_UNAVAILABLE: &str =
    "could not validate prefix: the server is unreachable or sent an invalid response";

/// Outcome of one validation attempt. Never cached or reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The prefix is unused and its hostname is not live.
    Valid { hostname: String },
    /// The backend (or the local blank-input check) refused the prefix.
    Rejected(Rejection),
    /// The check itself failed; nothing is known about the prefix.
    Unavailable,
}

/// Why a prefix was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Blank input, caught before any network call.
    EmptyPrefix,
    /// The prefix is already recorded in the instance cache.
    PrefixUsed { prefix: String },
    /// `{prefix}.{suffix}` already answers liveness probes.
    HostReachable { hostname: String },
    /// Any other backend reason, carried as its message.
    Other { message: String },
}

impl Verdict {
    /// Interpret the backend's answer for `prefix`.
    ///
    /// A `ping` rejection without a hostname falls back to the locally
    /// derived one.
    #[must_use]
    pub fn classify(wire: ValidationVerdict, prefix: &Prefix, domain_suffix: &str) -> Self {
        let hostname = wire
            .hostname
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| prefix.hostname(domain_suffix));
        if wire.valid {
            return Self::Valid { hostname };
        }
        let rejection = match wire.reason {
            Some(VerdictReason::Cache) => Rejection::PrefixUsed {
                prefix: prefix.to_string(),
            },
            Some(VerdictReason::Ping) => Rejection::HostReachable { hostname },
            Some(VerdictReason::Other(_)) | None => Rejection::Other {
                message: wire
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "prefix rejected by the server".to_string()),
            },
        };
        Self::Rejected(rejection)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Human-readable reason for a non-valid verdict.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Valid { .. } => None,
            Self::Rejected(rejection) => Some(rejection.to_string()),
            Self::Unavailable => Some(VALIDATION_UNAVAILABLE.to_string()),
        }
    }

    /// Short machine-readable code for JSON output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Valid { .. } => "valid",
            Self::Rejected(Rejection::EmptyPrefix) => "empty",
            Self::Rejected(Rejection::PrefixUsed { .. }) => "cache",
            Self::Rejected(Rejection::HostReachable { .. }) => "ping",
            Self::Rejected(Rejection::Other { .. }) => "other",
            Self::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPrefix => f.write_str("please enter a prefix"),
            Self::PrefixUsed { prefix } => write!(f, "prefix '{prefix}' is already used"),
            Self::HostReachable { hostname } => {
                write!(f, "hostname {hostname} is already reachable")
            }
            Self::Other { message } => f.write_str(message),
        }
    }
}
