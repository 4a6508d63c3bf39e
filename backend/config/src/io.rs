//! Config file location and loading.

use crate::schema::FloraConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Env var pointing directly at a config file.
pub const CONFIG_PATH_VAR: &str = "FLORASCOPE_CONFIG";

/// Resolve the config file path.
/// Priority: `FLORASCOPE_CONFIG` env > `~/.florascope/config.yaml` > `./.florascope/config.yaml`
pub fn config_file_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".florascope")
        .join(CONFIG_FILE_NAME)
}

/// Load and parse the config file.
///
/// A missing file is not an error: the service runs on defaults plus env.
pub async fn load_config(path: &Path) -> Result<FloraConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(FloraConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

pub fn parse_config(raw: &str) -> Result<FloraConfig> {
    if raw.trim().is_empty() {
        return Ok(FloraConfig::default());
    }
    Ok(serde_yaml::from_str(raw)?)
}
