//! Application service: prefix pre-flight validation.

use tracing::{debug, warn};

use crate::application::ports::ProvisioningApi;
use crate::domain::prefix::Prefix;
use crate::domain::verdict::{Rejection, Verdict};

/// Checks that a prefix is unused and its hostname is not already live.
///
/// Read-only; every call issues a fresh request and nothing is cached.
pub struct PrefixValidator<'a, A> {
    api: &'a A,
    domain_suffix: &'a str,
}

impl<'a, A: ProvisioningApi> PrefixValidator<'a, A> {
    #[must_use]
    pub fn new(api: &'a A, domain_suffix: &'a str) -> Self {
        Self { api, domain_suffix }
    }

    /// Validate raw user input. Blank input is rejected without a request.
    pub async fn validate(&self, raw: &str) -> Verdict {
        match Prefix::parse(raw) {
            Ok(prefix) => self.validate_prefix(&prefix).await,
            Err(_) => Verdict::Rejected(Rejection::EmptyPrefix),
        }
    }

    /// Validate an already-normalized prefix.
    pub async fn validate_prefix(&self, prefix: &Prefix) -> Verdict {
        debug!(%prefix, "validating prefix");
        match self.api.validate(prefix.as_str()).await {
            Ok(wire) => {
                let verdict = Verdict::classify(wire, prefix, self.domain_suffix);
                debug!(%prefix, code = verdict.code(), "validation verdict");
                verdict
            }
            Err(e) => {
                warn!(%prefix, error = format!("{e:#}"), "validation request failed");
                Verdict::Unavailable
            }
        }
    }
}
