//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside string values, resolved at load time
//!   (uppercase `[A-Z_][A-Z0-9_]*` names only; `$${VAR}` stays literal as `${VAR}`).
//! - Well-known variables that override file values outright, such as the
//!   provider credential `GOOGLE_GEMINI_API_KEY`.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::{FloraConfig, GatewayConfig, LoggingConfig, VisionConfig};

/// Credential for the Gemini provider.
pub const GEMINI_API_KEY_VAR: &str = "GOOGLE_GEMINI_API_KEY";
/// Credential for the OpenAI provider.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BIND_VAR: &str = "FLORASCOPE_BIND";
pub const PORT_VAR: &str = "FLORASCOPE_PORT";

/// Matches `${VAR}` and the escaped form `$${VAR}`.
static ENV_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references using the process environment.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute `${VAR}` references using the given map.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    walk(value, env, "")
}

fn walk(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    Ok(match value {
        Value::String(s) => Value::String(substitute(s, env, path)?),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, v)| walk(v, env, &format!("{path}[{i}]")))
                .collect::<Result<_>>()?,
        ),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let child = if path.is_empty() { k.clone() } else { format!("{path}.{k}") };
                out.insert(k.clone(), walk(v, env, &child)?);
            }
            Value::Object(out)
        }
        other => other.clone(),
    })
}

fn substitute(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains("${") {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let out = ENV_REF.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{name}}}");
        }
        match env.get(name).filter(|v| !v.is_empty()) {
            Some(v) => v.clone(),
            None => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(out.into_owned())
}

/// Apply well-known environment overrides from the process environment.
pub fn apply_env_overrides(config: FloraConfig) -> FloraConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply well-known environment overrides from the given map.
///
/// The credential variable that applies depends on the configured provider
/// (Gemini when none is set).
pub fn apply_env_overrides_with(
    mut config: FloraConfig,
    env: &HashMap<String, String>,
) -> FloraConfig {
    let get = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();

    let vision = config.vision.get_or_insert_with(VisionConfig::default);
    let key_var = match vision.provider.as_deref() {
        Some("openai") => OPENAI_API_KEY_VAR,
        _ => GEMINI_API_KEY_VAR,
    };
    if let Some(key) = get(key_var) {
        vision.api_key = Some(key);
    }

    let gateway = config.gateway.get_or_insert_with(GatewayConfig::default);
    if let Some(bind) = get(BIND_VAR) {
        gateway.bind = Some(bind);
    }
    if let Some(port) = get(PORT_VAR).and_then(|p| p.parse().ok()) {
        gateway.port = Some(port);
    }

    if let Some(level) = get("RUST_LOG") {
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level);
    }

    config
}
