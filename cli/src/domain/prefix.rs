//! Instance prefixes and derived hostnames.

use std::fmt;

use crate::domain::error::WorkflowError;

/// A user-supplied instance prefix, trimmed and guaranteed non-empty.
///
/// Format rules beyond that are enforced by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Prefix(String);

impl Prefix {
    /// Trim `raw` and reject it when nothing is left.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::EmptyPrefix`] for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Result<Self, WorkflowError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WorkflowError::EmptyPrefix);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hostname this prefix provisions: `{prefix}.{suffix}`.
    #[must_use]
    pub fn hostname(&self, domain_suffix: &str) -> String {
        hostname(&self.0, domain_suffix)
    }
}

/// Join a prefix and the fixed domain suffix.
#[must_use]
pub fn hostname(prefix: &str, domain_suffix: &str) -> String {
    let suffix = domain_suffix.trim().trim_matches('.');
    if suffix.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}.{suffix}")
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
