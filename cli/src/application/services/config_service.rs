//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{self, ClientConfig};

/// Load configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<ClientConfig> {
    store.load()
}

/// Validate `key = value`, apply it to the stored configuration and save.
///
/// Nothing is written when validation fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<ClientConfig> {
    let mut config = store.load()?;
    config::apply_setting(&mut config, key, value)?;
    store.save(&config)?;
    Ok(config)
}

/// Load configuration and apply a one-off server URL override.
pub fn resolve(store: &impl ConfigStore, server_override: Option<&str>) -> Result<ClientConfig> {
    let mut config = store.load()?;
    if let Some(url) = server_override {
        config::apply_setting(&mut config, "server.url", url)?;
    }
    Ok(config)
}
