//! Domain types and validators for provctl configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "server.url",
    "server.request_timeout_secs",
    "hostname.domain_suffix",
    "polling.interval_ms",
    "polling.max_duration_secs",
];

/// Values accepted to clear an optional setting.
const UNSET_VALUES: &[&str] = &["none", "off"];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.provctl/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend connection settings.
    pub server: ServerConfig,
    /// Hostname derivation.
    pub hostname: HostnameConfig,
    /// Job polling.
    pub polling: PollingConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the provisioning backend.
    pub url: String,
    /// Per-request timeout. Unset means requests may wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Hostname derivation: `{prefix}.{domain_suffix}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostnameConfig {
    pub domain_suffix: String,
}

impl Default for HostnameConfig {
    fn default() -> Self {
        Self {
            domain_suffix: "instances.local".to_string(),
        }
    }
}

/// Job polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Fixed interval between status requests.
    pub interval_ms: u64,
    /// Give up after this long. Unset means poll until a terminal status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration_secs: Option<u64>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            max_duration_secs: None,
        }
    }
}

impl PollingConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }

    #[must_use]
    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration_secs.map(Duration::from_secs)
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let invalid = |hint: &str| -> anyhow::Error {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            hint: hint.to_string(),
        }
        .into()
    };
    match key {
        "server.url" => {
            let rest = value
                .strip_prefix("http://")
                .or_else(|| value.strip_prefix("https://"))
                .ok_or_else(|| invalid("Expected an http:// or https:// URL"))?;
            if rest.is_empty() || rest.starts_with('/') || rest.contains(char::is_whitespace) {
                return Err(invalid("Expected an http:// or https:// URL with a host"));
            }
        }
        "hostname.domain_suffix" => {
            let suffix = value.trim_matches('.');
            if suffix.is_empty()
                || !suffix
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
            {
                return Err(invalid("Expected a DNS suffix such as instances.local"));
            }
        }
        "polling.interval_ms" => {
            parse_positive(value).ok_or_else(|| invalid("Expected a positive integer"))?;
        }
        "server.request_timeout_secs" | "polling.max_duration_secs" => {
            if !is_unset(value) {
                parse_positive(value)
                    .ok_or_else(|| invalid("Expected a positive integer or 'none'"))?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Validate and apply `key = value` to `config`.
///
/// # Errors
///
/// Returns an error if the key or value is invalid.
pub fn apply_setting(config: &mut ClientConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    let optional = || {
        if is_unset(value) {
            None
        } else {
            parse_positive(value)
        }
    };
    match key {
        "server.url" => config.server.url = value.trim_end_matches('/').to_string(),
        "server.request_timeout_secs" => config.server.request_timeout_secs = optional(),
        "hostname.domain_suffix" => {
            config.hostname.domain_suffix = value.trim_matches('.').to_string();
        }
        "polling.interval_ms" => {
            config.polling.interval_ms = parse_positive(value).unwrap_or(1000);
        }
        "polling.max_duration_secs" => config.polling.max_duration_secs = optional(),
        _ => {}
    }
    Ok(())
}

/// Flattened `key → value` view used by `config show`.
#[must_use]
pub fn entries(config: &ClientConfig) -> Vec<(&'static str, String)> {
    let opt = |v: Option<u64>| v.map_or_else(|| "none".to_string(), |n| n.to_string());
    vec![
        ("server.url", config.server.url.clone()),
        (
            "server.request_timeout_secs",
            opt(config.server.request_timeout_secs),
        ),
        (
            "hostname.domain_suffix",
            config.hostname.domain_suffix.clone(),
        ),
        ("polling.interval_ms", config.polling.interval_ms.to_string()),
        (
            "polling.max_duration_secs",
            opt(config.polling.max_duration_secs),
        ),
    ]
}

fn is_unset(value: &str) -> bool {
    UNSET_VALUES.contains(&value.to_ascii_lowercase().as_str())
}

fn parse_positive(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

// ── Unit tests ───────────────────────────────────────────────────────────────
