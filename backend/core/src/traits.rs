use anyhow::Result;
use async_trait::async_trait;

use crate::types::{ImageInput, RawModelResponse};

/// An image-understanding backend (Gemini, OpenAI, a test double).
///
/// Implementations encode the image for transport, send it with the prompt,
/// and hand back whatever text the model produced without inspecting it.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Model used when the request does not name one.
    fn default_model(&self) -> &str;

    /// Send one image + prompt and return the raw answer.
    async fn describe(&self, request: &VisionRequest<'_>) -> Result<RawModelResponse>;
}

/// One outbound request to a vision provider.
#[derive(Debug, Clone)]
pub struct VisionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub image: &'a ImageInput,
}
