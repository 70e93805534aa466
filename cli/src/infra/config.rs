//! YAML file backing for the `ConfigStore` port.
//!
//! The file lives at `~/.provctl/config.yaml` unless `PROVCTL_CONFIG` names
//! another one. Writes go through a sibling temp file and a rename, so an
//! interrupted `config set` never leaves a truncated file behind.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::application::ports::ConfigStore;
use crate::domain::config::ClientConfig;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "PROVCTL_CONFIG";

/// Config store reading and writing a YAML file.
#[derive(Debug, Clone, Default)]
pub struct YamlConfigStore {
    /// Fixed location; `None` resolves `PROVCTL_CONFIG` or the home default
    /// on every call.
    fixed: Option<PathBuf>,
}

impl YamlConfigStore {
    /// A store pinned to `path`, ignoring the environment.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            fixed: Some(path.into()),
        }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<ClientConfig> {
        let path = self.path()?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ClientConfig::default()),
            Err(e) => return Err(e).with_context(|| format!("cannot read {}", path.display())),
        };
        if content.trim().is_empty() {
            return Ok(ClientConfig::default());
        }
        serde_yaml::from_str(&content).with_context(|| {
            format!(
                "cannot parse {} (fix it by hand or remove it to start from defaults)",
                path.display()
            )
        })
    }

    fn save(&self, config: &ClientConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;

        let staging = staging_path(&path);
        write_private(&staging, content.as_bytes())
            .with_context(|| format!("cannot write {}", staging.display()))?;
        if let Err(e) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(e).with_context(|| format!("cannot replace {}", path.display()));
        }
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.fixed {
            return Ok(path.clone());
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(val) if !val.is_empty() => Ok(PathBuf::from(val)),
            _ => dirs::home_dir()
                .map(|home| home.join(".provctl").join("config.yaml"))
                .ok_or_else(|| anyhow!("cannot determine home directory; set {CONFIG_ENV}")),
        }
    }
}

/// `config.yaml` -> `.config.yaml.tmp` in the same directory, so the final
/// rename never crosses filesystems.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "config.yaml".into(), |n| n.to_string_lossy());
    path.with_file_name(format!(".{name}.tmp"))
}

/// Create or truncate `path` readable by the owner only, then write `bytes`.
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    std::os::unix::fs::OpenOptionsExt::mode(&mut options, 0o600);
    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        // `mode` only applies on creation; a leftover staging file keeps its bits.
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(bytes)?;
    file.sync_all()
}
