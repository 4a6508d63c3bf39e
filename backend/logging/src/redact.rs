//! Log Redaction
//!
//! Scrubs provider API keys and bearer tokens from strings prior to logging.
//! Provider error bodies and request URLs can echo credentials back.

use regex::Regex;
use std::sync::LazyLock;

static GOOGLE_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AIza[0-9A-Za-z\-_]{20,}").unwrap());
static OPENAI_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sk-[A-Za-z0-9\-_]{16,}").unwrap());
static BEARER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[A-Za-z0-9\-\._~+/]+=*").unwrap());
static KEY_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([?&]key=)[^&\s]+").unwrap());

/// Redact credential-looking substrings.
pub fn redact_secrets(input: &str) -> String {
    let out = KEY_PARAM_RE.replace_all(input, "${1}[REDACTED]");
    let out = GOOGLE_KEY_RE.replace_all(&out, "[REDACTED_KEY]");
    let out = OPENAI_KEY_RE.replace_all(&out, "[REDACTED_KEY]");
    BEARER_RE.replace_all(&out, "Bearer [REDACTED_TOKEN]").into_owned()
}
