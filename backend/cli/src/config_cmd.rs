//! CLI Config Command
//!
//! Prints the effective configuration (file + env + defaults) with
//! credentials masked, followed by any validation warnings.

use std::path::Path;

use anyhow::{Context, Result};
use florascope_config::{redact, validate, FloraConfig};

use crate::terminal_output::{note_success, note_warn};

pub fn run(config: &FloraConfig, path: &Path) -> Result<()> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    let yaml = serde_yaml::to_string(&redact(&value)).context("Failed to render config")?;

    println!("# {}", path.display());
    print!("{yaml}");

    let report = validate(config);
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    if report.warnings.is_empty() {
        note_success("Configuration looks good");
    }
    Ok(())
}
