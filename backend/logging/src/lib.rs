//! Structured logging for Florascope.
//!
//! Sets up the global `tracing` subscriber and scrubs credentials from text
//! before it reaches a log line.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_secrets;
