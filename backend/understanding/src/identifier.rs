//! Submission component: validates the photo, sends it with the fixed
//! identification prompt to the configured provider, and relays the answer.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use florascope_config::defaults::{DEFAULT_PROVIDER, DEFAULT_TIMEOUT_SECS};
use florascope_config::{VisionConfig, GEMINI_API_KEY_VAR, OPENAI_API_KEY_VAR};
use florascope_core::{
    FloraError, ImageInput, PlantRecord, RawModelResponse, VisionProvider, VisionRequest,
    IDENTIFICATION_PROMPT,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::interpreter::interpret;
use crate::mock::MockProvider;
use crate::vision::{GeminiProvider, OpenAiProvider};

/// Raw answer plus the record interpreted from it.
#[derive(Debug, Clone, Serialize)]
pub struct Identification {
    pub result: RawModelResponse,
    pub record: PlantRecord,
}

pub struct PlantIdentifier {
    provider: Option<Arc<dyn VisionProvider>>,
    model: Option<String>,
    /// Why `provider` is absent, for operator diagnostics.
    unconfigured_reason: String,
}

impl PlantIdentifier {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self {
            provider: Some(provider),
            model: None,
            unconfigured_reason: String::new(),
        }
    }

    /// An identifier that answers every request with "service not configured".
    pub fn unconfigured(reason: impl Into<String>) -> Self {
        Self {
            provider: None,
            model: None,
            unconfigured_reason: reason.into(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Build the provider named in the config.
    ///
    /// A missing credential is not an error here; it surfaces per request.
    pub fn from_config(config: &VisionConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let provider_name = config.provider.as_deref().unwrap_or(DEFAULT_PROVIDER);

        let provider: Arc<dyn VisionProvider> = match (provider_name, config.credential()) {
            ("mock", _) => Arc::new(MockProvider::new()),
            ("gemini", Some(key)) => {
                let mut p = GeminiProvider::new(key, timeout)?;
                if let Some(endpoint) = &config.endpoint {
                    p = p.with_endpoint(endpoint.as_str());
                }
                Arc::new(p)
            }
            ("openai", Some(key)) => {
                let mut p = OpenAiProvider::new(key, timeout)?;
                if let Some(endpoint) = &config.endpoint {
                    p = p.with_endpoint(endpoint.as_str());
                }
                Arc::new(p)
            }
            ("gemini", None) => {
                warn!("{GEMINI_API_KEY_VAR} is not set");
                return Ok(Self::unconfigured(format!("{GEMINI_API_KEY_VAR} is not set")));
            }
            ("openai", None) => {
                warn!("{OPENAI_API_KEY_VAR} is not set");
                return Ok(Self::unconfigured(format!("{OPENAI_API_KEY_VAR} is not set")));
            }
            (other, _) => bail!("Unknown vision provider '{other}'"),
        };

        let identifier = Self::new(provider);
        Ok(match &config.model {
            Some(model) => identifier.with_model(model.as_str()),
            None => identifier,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.name())
    }

    /// Submit one photo and return the provider's text verbatim.
    ///
    /// Checks run in order: image present and non-empty, provider configured.
    /// Nothing goes over the network unless both hold.
    #[instrument(skip_all)]
    pub async fn identify(&self, image: Option<&ImageInput>) -> Result<RawModelResponse, FloraError> {
        let image = match image {
            Some(image) if !image.is_empty() => image,
            _ => {
                info!("No image provided");
                return Err(FloraError::NoImage);
            }
        };
        info!(
            name = image.file_name.as_deref().unwrap_or("<unnamed>"),
            mime = %image.mime_type,
            size = image.len(),
            "Image received"
        );

        let Some(provider) = &self.provider else {
            warn!(reason = %self.unconfigured_reason, "Vision provider is not configured");
            return Err(FloraError::NotConfigured(self.unconfigured_reason.clone()));
        };

        let request = VisionRequest {
            model: self.model.as_deref().unwrap_or_else(|| provider.default_model()),
            prompt: IDENTIFICATION_PROMPT,
            image,
        };
        info!(provider = provider.name(), model = request.model, "Sending identification request");

        let response = provider.describe(&request).await.map_err(FloraError::request_failed)?;
        info!(chars = response.as_str().len(), "Received identification response");
        Ok(response)
    }

    /// `identify`, then interpret the answer.
    pub async fn identify_record(&self, image: Option<&ImageInput>) -> Result<Identification, FloraError> {
        let result = self.identify(image).await?;
        let record = interpret(result.as_str());
        Ok(Identification { result, record })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn photo() -> ImageInput {
        ImageInput::new(vec![0xFFu8, 0xD8, 0xFF], "image/jpeg").with_file_name("leaf.jpg")
    }

    #[tokio::test]
    async fn missing_image_makes_no_call() {
        let mock = Arc::new(MockProvider::new());
        let identifier = PlantIdentifier::new(mock.clone());
        let err = identifier.identify(None).await.unwrap_err();
        assert!(matches!(err, FloraError::NoImage));
        assert_eq!(err.user_message(), "no image provided");
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn empty_image_is_no_image() {
        let mock = Arc::new(MockProvider::new());
        let identifier = PlantIdentifier::new(mock.clone());
        let empty = ImageInput::new(Vec::new(), "image/png");
        assert!(matches!(identifier.identify(Some(&empty)).await, Err(FloraError::NoImage)));
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn unconfigured_reports_not_configured() {
        let identifier = PlantIdentifier::unconfigured("GOOGLE_GEMINI_API_KEY is not set");
        let err = identifier.identify(Some(&photo())).await.unwrap_err();
        assert_eq!(err.user_message(), "service not configured");
        assert!(!identifier.is_configured());
    }

    #[tokio::test]
    async fn no_image_checked_before_configuration() {
        let identifier = PlantIdentifier::unconfigured("missing key");
        assert!(matches!(identifier.identify(None).await, Err(FloraError::NoImage)));
    }

    #[tokio::test]
    async fn returns_text_verbatim() {
        let text = "  name: Fern  \n\nsomething odd";
        let mock = Arc::new(MockProvider::with_response(text));
        let identifier = PlantIdentifier::new(mock.clone());
        let raw = identifier.identify(Some(&photo())).await.unwrap();
        assert_eq!(raw.as_str(), text);
        assert_eq!(mock.last_mime_type().as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn provider_failure_becomes_request_failed() {
        let identifier = PlantIdentifier::new(Arc::new(MockProvider::failing("quota exhausted")));
        match identifier.identify(Some(&photo())).await {
            Err(FloraError::RequestFailed { message, detail }) => {
                assert_eq!(message, "quota exhausted");
                assert!(detail.unwrap().contains("quota exhausted"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn identify_record_interprets() {
        let identifier = PlantIdentifier::new(Arc::new(MockProvider::new()));
        let id = identifier.identify_record(Some(&photo())).await.unwrap();
        assert_eq!(id.record.scientific_name(), Some("Helianthus annuus"));
        assert_eq!(id.record.family(), Some("Asteraceae"));
    }

    #[test]
    fn from_config_without_key_is_unconfigured() {
        let identifier = PlantIdentifier::from_config(&VisionConfig::default()).unwrap();
        assert!(!identifier.is_configured());
    }

    #[test]
    fn from_config_mock_needs_no_key() {
        let config = VisionConfig {
            provider: Some("mock".into()),
            ..Default::default()
        };
        let identifier = PlantIdentifier::from_config(&config).unwrap();
        assert_eq!(identifier.provider_name(), Some("mock"));
    }

    fn gemini_config(endpoint: String) -> VisionConfig {
        VisionConfig {
            provider: Some("gemini".into()),
            api_key: Some("test-key".into()),
            model: Some("custom-model".into()),
            endpoint: Some(endpoint),
            timeout_secs: Some(1),
        }
    }

    #[tokio::test]
    async fn from_config_routes_model_and_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/custom-model:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "name: Fern" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let identifier = PlantIdentifier::from_config(&gemini_config(server.uri())).unwrap();
        let raw = identifier.identify(Some(&photo())).await.unwrap();
        assert_eq!(raw.as_str(), "name: Fern");
    }

    #[tokio::test]
    async fn configured_timeout_becomes_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "candidates": [] }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let identifier = PlantIdentifier::from_config(&gemini_config(server.uri())).unwrap();
        match identifier.identify(Some(&photo())).await {
            Err(FloraError::RequestFailed { message, detail }) => {
                assert_eq!(message, "Gemini request failed");
                assert!(detail.unwrap().contains("custom-model:generateContent"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn from_config_unknown_provider_fails() {
        let config = VisionConfig {
            provider: Some("plantnet".into()),
            api_key: Some("k".into()),
            ..Default::default()
        };
        assert!(PlantIdentifier::from_config(&config).is_err());
    }
}
