//! Structured Logger
//!
//! Console output (human-readable or JSON) plus an optional daily-rolling
//! NDJSON file, with `RUST_LOG` taking precedence over the configured level.

use florascope_config::LoggingConfig;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "florascope.log";

/// Initialize the global subscriber. Calling it twice is a no-op.
///
/// Console output goes to stderr so command output on stdout stays parseable.
pub fn init_logger(config: &LoggingConfig) {
    let level = config.level.as_deref().unwrap_or("info");
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let json = config.json.unwrap_or(false);

    let console_json = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let console_plain = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true)
    });

    // Writes `florascope.log.YYYY-MM-DD` under the configured directory.
    let file_layer = config.dir.as_ref().map(|dir| {
        fmt::layer()
            .json()
            .with_writer(RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX))
            .with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_json)
        .with(console_plain)
        .with(file_layer)
        .try_init();
}
