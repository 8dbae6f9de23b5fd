use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::ArborConfig;

pub const CONFIG_FILE: &str = "arbor.toml";

/// Error type for reading arbor.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse arbor.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Read `arbor.toml` from `dir`. A missing file yields the defaults.
pub fn read_config(dir: &Path) -> Result<ArborConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        tracing::debug!(dir = %dir.display(), "no arbor.toml, using defaults");
        return Ok(ArborConfig::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}

/// Resolve the node store path for a config rooted at `dir`
pub fn store_path(dir: &Path, config: &ArborConfig) -> PathBuf {
    dir.join(&config.store.file)
}
