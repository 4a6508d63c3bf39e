//! Config defaults: fills in everything the runtime needs after loading.

use crate::schema::{FloraConfig, GatewayConfig, LoggingConfig, VisionConfig};

pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
/// 10 MiB; phone photos are usually well below this.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: FloraConfig) -> FloraConfig {
    let config = apply_vision_defaults(config);
    let config = apply_gateway_defaults(config);
    apply_logging_defaults(config)
}

fn apply_vision_defaults(mut config: FloraConfig) -> FloraConfig {
    let vision = config.vision.get_or_insert_with(VisionConfig::default);
    let provider = vision
        .provider
        .get_or_insert_with(|| DEFAULT_PROVIDER.to_string())
        .clone();
    if vision.model.is_none() {
        vision.model = match provider.as_str() {
            "openai" => Some(DEFAULT_OPENAI_MODEL.to_string()),
            "gemini" => Some(DEFAULT_GEMINI_MODEL.to_string()),
            _ => None,
        };
    }
    if vision.timeout_secs.is_none() {
        vision.timeout_secs = Some(DEFAULT_TIMEOUT_SECS);
    }
    config
}

fn apply_gateway_defaults(mut config: FloraConfig) -> FloraConfig {
    let gateway = config.gateway.get_or_insert_with(GatewayConfig::default);
    gateway.bind.get_or_insert_with(|| DEFAULT_BIND.to_string());
    gateway.port.get_or_insert(DEFAULT_PORT);
    gateway.max_upload_bytes.get_or_insert(DEFAULT_MAX_UPLOAD_BYTES);
    config
}

fn apply_logging_defaults(mut config: FloraConfig) -> FloraConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging.level.get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.json.get_or_insert(false);
    config
}
