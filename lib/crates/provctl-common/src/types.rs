use serde::{Deserialize, Deserializer, Serialize};

use crate::Timestamp;

/// Reason code attached to a rejected validation verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VerdictReason {
    /// The prefix is already recorded in the backend instance cache.
    Cache,
    /// The derived hostname currently answers liveness probes.
    Ping,
    /// Any other code the backend chooses to report.
    Other(String),
}

impl From<String> for VerdictReason {
    fn from(code: String) -> Self {
        match code.as_str() {
            "cache" => Self::Cache,
            "ping" => Self::Ping,
            _ => Self::Other(code),
        }
    }
}

impl From<VerdictReason> for String {
    fn from(reason: VerdictReason) -> Self {
        match reason {
            VerdictReason::Cache => "cache".to_string(),
            VerdictReason::Ping => "ping".to_string(),
            VerdictReason::Other(code) => code,
        }
    }
}

/// Response of `GET /api/validate/{prefix}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<VerdictReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

/// Body of `POST /api/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    pub text: String,
}

/// Response of `POST /api/start`.
///
/// `job_id` is optional on the wire; its absence is a submission failure the
/// caller has to handle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResponse {
    #[serde(default, deserialize_with = "optional_id")]
    pub job_id: Option<String>,
}

/// Lifecycle status of a backend job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
    /// A status this client does not know; treated as still in progress.
    Unknown(String),
}

impl JobStatus {
    /// `completed` and `failed` end polling permanently.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl From<String> for JobStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "running" => Self::Running,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Unknown(status),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Running => "running".to_string(),
            JobStatus::Completed => "completed".to_string(),
            JobStatus::Failed => "failed".to_string(),
            JobStatus::Unknown(other) => other,
        }
    }
}

/// Response of `GET /api/status/{job_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusReport {
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<String>,
    /// Single-error variant some backend paths return instead of `errors`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

impl JobStatusReport {
    /// A report carrying only a status.
    #[must_use]
    pub fn with_status(status: JobStatus) -> Self {
        Self {
            status,
            started_at: None,
            output: None,
            errors: None,
            error: None,
            log_file: None,
        }
    }

    /// Diagnostic text for a failed job: every non-blank one of `errors` and
    /// `error`, joined with `; `. Identical texts are shown once.
    #[must_use]
    pub fn failure_detail(&self) -> Option<String> {
        let mut parts: Vec<&str> = Vec::with_capacity(2);
        for text in [self.errors.as_deref(), self.error.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
        {
            if !text.is_empty() && !parts.contains(&text) {
                parts.push(text);
            }
        }
        (!parts.is_empty()).then(|| parts.join("; "))
    }
}

/// One entry of `GET /api/instances`: a completed provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    #[serde(deserialize_with = "id")]
    pub id: String,
    pub hostname_prefix: String,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    #[serde(default)]
    pub log_file: Option<String>,
}

/// Response of `GET /api/ping/{prefix}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub reachable: bool,
}

/// Response of `POST /api/clear-cache`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCacheResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// Identifiers arrive as strings from some endpoints and integers from others.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn id<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    RawId::deserialize(de).map(String::from)
}

fn optional_id<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(de)?
        .map(String::from)
        .filter(|s| !s.trim().is_empty()))
}
