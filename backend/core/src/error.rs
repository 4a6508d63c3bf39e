use thiserror::Error;

/// Failure of one identification request.
///
/// Every variant is scoped to a single request; none is fatal to the process.
#[derive(Debug, Error)]
pub enum FloraError {
    #[error("no image provided")]
    NoImage,

    #[error("service not configured: {0}")]
    NotConfigured(String),

    /// Transport or provider failure. `detail` is operator-facing diagnostics
    /// (error chain, provider body) and is never shown to end users.
    #[error("request failed: {message}")]
    RequestFailed {
        message: String,
        detail: Option<String>,
    },
}

impl FloraError {
    /// Wrap an arbitrary error as a request failure, keeping its full source
    /// chain as the diagnostic detail.
    pub fn request_failed(err: impl Into<anyhow::Error>) -> Self {
        let err = err.into();
        Self::RequestFailed {
            message: err.to_string(),
            detail: Some(format!("{err:#}")),
        }
    }

    /// Text that is safe to show to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoImage => "no image provided".to_string(),
            Self::NotConfigured(_) => "service not configured".to_string(),
            Self::RequestFailed { message, .. } => format!("request failed: {message}"),
        }
    }

    /// Diagnostic detail for logs, if any.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::NotConfigured(what) => Some(what.clone()),
            Self::RequestFailed { detail, .. } => detail.clone(),
            Self::NoImage => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn no_image_message() {
        assert_eq!(FloraError::NoImage.user_message(), "no image provided");
        assert!(FloraError::NoImage.detail().is_none());
    }

    #[test]
    fn not_configured_hides_detail_from_user() {
        let err = FloraError::NotConfigured("GOOGLE_GEMINI_API_KEY is not set".into());
        assert_eq!(err.user_message(), "service not configured");
        assert!(err.detail().unwrap().contains("GOOGLE_GEMINI_API_KEY"));
    }

    #[test]
    fn request_failed_keeps_chain() {
        let inner: anyhow::Result<()> = Err(anyhow::anyhow!("connection reset"));
        let err = inner.context("Gemini request").unwrap_err();
        let err = FloraError::request_failed(err);
        assert_eq!(err.user_message(), "request failed: Gemini request");
        let detail = err.detail().unwrap();
        assert!(detail.contains("Gemini request"));
        assert!(detail.contains("connection reset"));
    }
}
