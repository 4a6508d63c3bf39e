/// Vision providers: send a photo plus prompt to a hosted vision LLM and
/// return its text answer untouched.
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use florascope_config::defaults::{DEFAULT_GEMINI_MODEL, DEFAULT_OPENAI_MODEL};
use florascope_core::{RawModelResponse, VisionProvider, VisionRequest};
use florascope_logging::redact_secrets;
use serde_json::Value;
use tracing::{debug, info};

pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

const MAX_OUTPUT_TOKENS: u32 = 1024;

fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Read the body of a non-success reply into an error, with credentials scrubbed.
async fn status_error(provider: &str, resp: reqwest::Response) -> anyhow::Error {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    anyhow::anyhow!("{provider} vision error ({status}): {}", redact_secrets(&body))
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            endpoint: GEMINI_ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl VisionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    async fn describe(&self, request: &VisionRequest<'_>) -> Result<RawModelResponse> {
        info!(model = request.model, bytes = request.image.len(), "[Vision] Describing image via Gemini");
        let body = serde_json::json!({
            "contents": [{ "parts": [
                { "text": request.prompt },
                { "inlineData": {
                    "mimeType": request.image.mime_type,
                    "data": STANDARD.encode(&request.image.data),
                } }
            ]}],
            "generationConfig": { "maxOutputTokens": MAX_OUTPUT_TOKENS }
        });
        let url = format!("{}/models/{}:generateContent", self.endpoint, request.model);
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Gemini request failed")?;
        if !resp.status().is_success() {
            return Err(status_error("Gemini", resp).await);
        }
        let json: Value = resp.json().await.context("Gemini reply was not valid JSON")?;
        let text = gemini_text(&json)?;
        debug!(chars = text.len(), "[Vision] Gemini answered");
        Ok(RawModelResponse::new(text))
    }
}

/// Concatenate the text parts of the first candidate.
fn gemini_text(json: &Value) -> Result<String> {
    let parts = json["candidates"][0]["content"]["parts"].as_array();
    let texts: Vec<&str> = parts
        .into_iter()
        .flatten()
        .filter_map(|p| p["text"].as_str())
        .collect();
    if !texts.is_empty() {
        return Ok(texts.concat());
    }
    if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
        bail!("Gemini blocked the request: {reason}");
    }
    bail!("malformed provider reply: no text in Gemini response")
}

// ---------------------------------------------------------------------------
// OpenAI
// ---------------------------------------------------------------------------

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key: api_key.into(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            endpoint: OPENAI_ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl VisionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    async fn describe(&self, request: &VisionRequest<'_>) -> Result<RawModelResponse> {
        info!(model = request.model, bytes = request.image.len(), "[Vision] Describing image via OpenAI");
        let data_url = format!(
            "data:{};base64,{}",
            request.image.mime_type,
            STANDARD.encode(&request.image.data)
        );
        let body = serde_json::json!({
            "model": request.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": request.prompt },
                    { "type": "image_url", "image_url": { "url": data_url } }
                ]
            }],
            "max_tokens": MAX_OUTPUT_TOKENS
        });
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("OpenAI request failed")?;
        if !resp.status().is_success() {
            return Err(status_error("OpenAI", resp).await);
        }
        let json: Value = resp.json().await.context("OpenAI reply was not valid JSON")?;
        match json["choices"][0]["message"]["content"].as_str() {
            Some(text) => Ok(RawModelResponse::new(text)),
            None => bail!("malformed provider reply: no text in OpenAI response"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use florascope_core::ImageInput;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn image() -> ImageInput {
        ImageInput::new(b"\x89PNG fake".to_vec(), "image/png")
    }

    fn gemini(server: &MockServer) -> GeminiProvider {
        GeminiProvider::new("test-key", Duration::from_secs(5))
            .unwrap()
            .with_endpoint(server.uri())
    }

    #[tokio::test]
    async fn gemini_sends_inline_base64_and_joins_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [
                    { "text": "identify" },
                    { "inlineData": { "mimeType": "image/png", "data": STANDARD.encode(b"\x89PNG fake") } }
                ]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [
                    { "text": "name: Rose\n" },
                    { "text": "family: Rosaceae" }
                ]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let img = image();
        let provider = gemini(&server);
        let req = VisionRequest { model: "gemini-1.5-flash", prompt: "identify", image: &img };
        let text = provider.describe(&req).await.unwrap();
        assert_eq!(text.as_str(), "name: Rose\nfamily: Rosaceae");
    }

    #[tokio::test]
    async fn gemini_error_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let img = image();
        let req = VisionRequest { model: "gemini-1.5-flash", prompt: "p", image: &img };
        let err = gemini(&server).describe(&req).await.unwrap_err().to_string();
        assert!(err.contains("403"));
        assert!(err.contains("API key not valid"));
    }

    #[tokio::test]
    async fn gemini_blocked_prompt_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let img = image();
        let req = VisionRequest { model: "gemini-1.5-flash", prompt: "p", image: &img };
        let err = gemini(&server).describe(&req).await.unwrap_err().to_string();
        assert!(err.contains("SAFETY"));
    }

    #[tokio::test]
    async fn openai_uses_data_url_and_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({ "model": "gpt-4o" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "name: Monstera" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new("sk-test", Duration::from_secs(5))
            .unwrap()
            .with_endpoint(format!("{}/", server.uri()));
        let img = image();
        let req = VisionRequest { model: "gpt-4o", prompt: "p", image: &img };
        assert_eq!(provider.describe(&req).await.unwrap().as_str(), "name: Monstera");
    }

    #[tokio::test]
    async fn openai_reply_without_content_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::new("sk-test", Duration::from_secs(5))
            .unwrap()
            .with_endpoint(server.uri());
        let img = image();
        let req = VisionRequest { model: "gpt-4o", prompt: "p", image: &img };
        let err = provider.describe(&req).await.unwrap_err().to_string();
        assert!(err.contains("malformed provider reply"));
    }

    #[test]
    fn gemini_text_without_candidates_is_malformed() {
        let err = gemini_text(&json!({})).unwrap_err().to_string();
        assert!(err.contains("malformed provider reply"));
    }
}
