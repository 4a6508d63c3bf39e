//! `florascope-config`: runtime configuration for Florascope.
//!
//! Provides:
//! - Typed config schema (vision provider, gateway, logging)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Well-known env overrides (`GOOGLE_GEMINI_API_KEY`, `FLORASCOPE_PORT`, ...)
//! - Default value application and validation
//! - Redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, apply_env_overrides_with, resolve_env_vars, resolve_env_vars_with,
    MissingEnvVarError, GEMINI_API_KEY_VAR, OPENAI_API_KEY_VAR,
};
pub use io::{config_file_path, load_config, parse_config};
pub use redact::redact;
pub use schema::{FloraConfig, GatewayConfig, LoggingConfig, VisionConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Load a config file, substitute env vars, apply overrides and defaults.
///
/// Validation findings are logged; errors among them fail the load.
pub async fn load_and_prepare(path: &Path) -> Result<FloraConfig> {
    let raw = load_config(path).await?;
    prepare(raw, &std::env::vars().collect())
}

/// The processing pipeline behind `load_and_prepare`, with an explicit env.
pub fn prepare(raw: FloraConfig, env: &HashMap<String, String>) -> Result<FloraConfig> {
    let value = serde_json::to_value(&raw).context("Failed to serialize config for processing")?;
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;
    let config: FloraConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_all_defaults(apply_env_overrides_with(config, env));

    let report = validate(&config);
    report.log();
    if let Some(first) = report.errors.into_iter().next() {
        return Err(first.into());
    }

    Ok(config)
}
