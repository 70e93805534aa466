//! Instance roster: a point-in-time view of completed provisionings.

use provctl_common::{InstanceRecord, Timestamp};
use serde::Serialize;

use crate::domain::prefix::hostname;

/// Placeholder row shown when the backend has no instances.
pub const EMPTY_ROSTER: &str = "No instances yet. Create one with: provctl create <prefix>";

/// Result of the per-instance liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Liveness {
    Checking,
    Online,
    Offline,
    /// The probe request itself failed.
    Error,
}

impl Liveness {
    /// Map a finished probe: `None` means the probe request failed.
    #[must_use]
    pub fn from_probe(reachable: Option<bool>) -> Self {
        match reachable {
            Some(true) => Self::Online,
            Some(false) => Self::Offline,
            None => Self::Error,
        }
    }

    #[must_use]
    pub fn is_settled(self) -> bool {
        self != Self::Checking
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Error => "error",
        }
    }
}

/// One rendered roster row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub id: String,
    pub prefix: String,
    pub hostname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
    pub liveness: Liveness,
}

/// Build display rows from the raw backend list, newest first.
///
/// The backend appends records, so the raw list is reversed rather than
/// sorted; every row starts out `checking`.
#[must_use]
pub fn build_roster(records: Vec<InstanceRecord>, domain_suffix: &str) -> Vec<RosterEntry> {
    records
        .into_iter()
        .rev()
        .map(|rec| RosterEntry {
            hostname: hostname(&rec.hostname_prefix, domain_suffix),
            id: rec.id,
            prefix: rec.hostname_prefix,
            completed_at: rec.completed_at,
            log_file: rec.log_file,
            liveness: Liveness::Checking,
        })
        .collect()
}
