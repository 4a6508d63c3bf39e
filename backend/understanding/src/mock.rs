use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use florascope_core::{RawModelResponse, VisionProvider, VisionRequest};

const SAMPLE_ANSWER: &str = "\
name: Common Sunflower
scientificName: Helianthus annuus
family: Asteraceae
origin: North America
uses: Ornamental, edible seeds, oil production
description: A tall annual with large yellow flower heads that track the sun while young.";

/// A vision provider that returns a canned answer (or failure) without any
/// network traffic. Used by tests and by the `mock` provider setting.
pub struct MockProvider {
    outcome: Result<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_mime: Mutex<Option<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_response(SAMPLE_ANSWER)
    }

    pub fn with_response(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            delay: None,
            calls: AtomicUsize::new(0),
            last_mime: Mutex::new(None),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            ..Self::new()
        }
    }

    /// Wait before answering, to simulate a slow provider.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Media type of the most recent image, if any request was made.
    pub fn last_mime_type(&self) -> Option<String> {
        self.last_mime.lock().ok().and_then(|m| m.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn default_model(&self) -> &str {
        "mock"
    }

    async fn describe(&self, request: &VisionRequest<'_>) -> Result<RawModelResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_mime.lock() {
            *last = Some(request.image.mime_type.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            Ok(text) => Ok(RawModelResponse::new(text.clone())),
            Err(message) => Err(anyhow!(message.clone())),
        }
    }
}
