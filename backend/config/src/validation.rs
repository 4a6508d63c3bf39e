//! Config validation with field paths in every message.

use crate::schema::FloraConfig;
use thiserror::Error;

pub const KNOWN_PROVIDERS: &[&str] = &["gemini", "openai", "mock"];

#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Emit every finding through `tracing`.
    pub fn log(&self) {
        for warning in &self.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
        for error in &self.errors {
            tracing::error!(path = %error.path, message = %error.message, "Config error");
        }
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

pub fn validate(config: &FloraConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_vision(config, &mut report);
    validate_gateway(config, &mut report);
    report
}

/// A missing credential is only a warning: each request reports
/// "service not configured" instead of the process refusing to start.
fn validate_vision(config: &FloraConfig, report: &mut ValidationReport) {
    let Some(vision) = &config.vision else { return };
    let provider = vision.provider.as_deref().unwrap_or("gemini");
    if !KNOWN_PROVIDERS.contains(&provider) {
        report.error(
            "vision.provider",
            format!("Unknown provider '{provider}'. Use one of: {}", KNOWN_PROVIDERS.join(", ")),
        );
        return;
    }
    if provider != "mock" && vision.credential().is_none() {
        report.warn("vision.apiKey", "No API key set; identification requests will fail");
    }
    if vision.timeout_secs == Some(0) {
        report.error("vision.timeoutSecs", "timeoutSecs must be >= 1");
    }
    if let Some(endpoint) = &vision.endpoint {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            report.error("vision.endpoint", "endpoint must be an http(s) URL");
        }
    }
}

fn validate_gateway(config: &FloraConfig, report: &mut ValidationReport) {
    let Some(gw) = &config.gateway else { return };
    match gw.port {
        Some(0) => report.error("gateway.port", "port must be > 0"),
        Some(port) if port < 1024 && port != 80 && port != 443 => report.warn(
            "gateway.port",
            format!("Port {port} requires elevated privileges; consider using a port >= 1024"),
        ),
        _ => {}
    }
    if gw.max_upload_bytes == Some(0) {
        report.error("gateway.maxUploadBytes", "maxUploadBytes must be > 0");
    }
}
