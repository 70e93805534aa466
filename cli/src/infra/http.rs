//! Infrastructure implementation of the `ProvisioningApi` port over HTTP.

use std::time::Duration;

use anyhow::{Context, Result};
use provctl_common::{
    ClearCacheResponse, InstanceRecord, JobStatusReport, PingResponse, StartRequest,
    StartResponse, ValidationVerdict,
};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::ports::ProvisioningApi;
use crate::domain::ApiError;

const USER_AGENT: &str = concat!("provctl/", env!("CARGO_PKG_VERSION"));

/// reqwest client bound to one backend base URL.
///
/// Path segments are percent-encoded, so a prefix can never escape its
/// route. No request timeout is applied unless one is configured.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    /// Build a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not an absolute http(s) URL or the
    /// HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base = Url::parse(base_url.trim())
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https") && !u.cannot_be_a_base())
            .ok_or_else(|| ApiError::InvalidUrl(base_url.to_string()))?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("cannot build HTTP client")?;
        Ok(Self { client, base })
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        debug!(endpoint, "sending request");
        let response = request
            .send()
            .await
            .with_context(|| format!("{endpoint} request failed"))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }
            .into());
        }
        response
            .json::<T>()
            .await
            .with_context(|| format!("invalid {endpoint} response"))
    }
}

impl ProvisioningApi for HttpApi {
    async fn validate(&self, prefix: &str) -> Result<ValidationVerdict> {
        let url = self.url(&["api", "validate", prefix])?;
        self.send("validate", self.client.get(url)).await
    }

    async fn start_job(&self, prefix: &str) -> Result<StartResponse> {
        let url = self.url(&["api", "start"])?;
        let body = StartRequest {
            text: prefix.to_string(),
        };
        self.send("start", self.client.post(url).json(&body)).await
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusReport> {
        let url = self.url(&["api", "status", job_id])?;
        self.send("status", self.client.get(url)).await
    }

    async fn instances(&self) -> Result<Vec<InstanceRecord>> {
        let url = self.url(&["api", "instances"])?;
        self.send("instances", self.client.get(url)).await
    }

    async fn ping(&self, prefix: &str) -> Result<PingResponse> {
        let url = self.url(&["api", "ping", prefix])?;
        self.send("ping", self.client.get(url)).await
    }

    async fn clear_cache(&self) -> Result<ClearCacheResponse> {
        let url = self.url(&["api", "clear-cache"])?;
        self.send("clear-cache", self.client.post(url)).await
    }
}
