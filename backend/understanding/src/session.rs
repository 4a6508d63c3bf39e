//! Request sequencing for interactive callers.
//!
//! A session holds the state a UI would otherwise keep in ambient variables:
//! the selected photo, the loading flag, and the last outcome. Requests may
//! overlap; each `begin` hands out a ticket with a higher sequence number and
//! only the most recently issued ticket may publish its outcome, so a slow
//! earlier request can never overwrite a fresher result.

use std::sync::atomic::{AtomicU64, Ordering};

use florascope_core::{FloraError, ImageInput};
use tokio::sync::RwLock;
use tracing::debug;

use crate::identifier::{Identification, PlantIdentifier};

#[derive(Debug)]
pub struct RequestTicket {
    seq: u64,
    image: ImageInput,
}

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn image(&self) -> &ImageInput {
        &self.image
    }
}

/// Point-in-time copy of the session state.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub image: Option<ImageInput>,
    pub loading: bool,
    pub identification: Option<Identification>,
    /// User-facing error text of the latest request.
    pub error: Option<String>,
}

#[derive(Default)]
pub struct IdentificationSession {
    latest: AtomicU64,
    state: RwLock<SessionSnapshot>,
}

impl IdentificationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selected photo. Clears a previous error but keeps the
    /// last identification on display.
    pub async fn select_image(&self, image: ImageInput) {
        let mut state = self.state.write().await;
        state.image = Some(image);
        state.error = None;
    }

    /// Start a request for the selected photo.
    pub async fn begin(&self) -> Result<RequestTicket, FloraError> {
        let mut state = self.state.write().await;
        let image = state.image.clone().ok_or(FloraError::NoImage)?;
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        state.loading = true;
        state.identification = None;
        state.error = None;
        debug!(seq, "Identification request started");
        Ok(RequestTicket { seq, image })
    }

    /// Publish the outcome of a request. Returns `false` (and changes
    /// nothing) when a newer request has been started since `ticket` was issued.
    pub async fn complete(
        &self,
        ticket: RequestTicket,
        outcome: Result<Identification, FloraError>,
    ) -> bool {
        let mut state = self.state.write().await;
        let latest = self.latest.load(Ordering::SeqCst);
        if ticket.seq != latest {
            debug!(seq = ticket.seq, latest, "Discarding stale identification result");
            return false;
        }
        state.loading = false;
        match outcome {
            Ok(identification) => state.identification = Some(identification),
            Err(err) => {
                if let Some(detail) = err.detail() {
                    debug!(detail = %detail, "Identification failed");
                }
                state.error = Some(err.user_message());
            }
        }
        true
    }

    /// Begin, identify, and complete in one call.
    pub async fn run(&self, identifier: &PlantIdentifier) -> Result<bool, FloraError> {
        let ticket = self.begin().await?;
        let outcome = identifier.identify_record(Some(ticket.image())).await;
        Ok(self.complete(ticket, outcome).await)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;
    use std::sync::Arc;
    use std::time::Duration;

    fn photo() -> ImageInput {
        ImageInput::new(vec![1u8, 2, 3], "image/png")
    }

    #[tokio::test]
    async fn begin_without_image_fails() {
        let session = IdentificationSession::new();
        assert!(matches!(session.begin().await, Err(FloraError::NoImage)));
        assert!(!session.snapshot().await.loading);
    }

    #[tokio::test]
    async fn run_publishes_result() {
        let session = IdentificationSession::new();
        session.select_image(photo()).await;
        let identifier = PlantIdentifier::new(Arc::new(MockProvider::with_response("name: Ivy")));
        assert!(session.run(&identifier).await.unwrap());
        let snap = session.snapshot().await;
        assert!(!snap.loading);
        assert_eq!(snap.identification.unwrap().record.name(), Some("Ivy"));
        assert!(snap.error.is_none());
    }

    #[tokio::test]
    async fn failure_sets_user_message() {
        let session = IdentificationSession::new();
        session.select_image(photo()).await;
        let identifier = PlantIdentifier::unconfigured("no key");
        assert!(session.run(&identifier).await.unwrap());
        assert_eq!(session.snapshot().await.error.as_deref(), Some("service not configured"));
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let session = IdentificationSession::new();
        session.select_image(photo()).await;

        let first = session.begin().await.unwrap();
        let second = session.begin().await.unwrap();
        assert!(second.seq() > first.seq());

        let newer = PlantIdentifier::new(Arc::new(MockProvider::with_response("name: Fresh")));
        let fresh = newer.identify_record(Some(second.image())).await;
        assert!(session.complete(second, fresh).await);

        let older = PlantIdentifier::new(Arc::new(MockProvider::with_response("name: Stale")));
        let stale = older.identify_record(Some(first.image())).await;
        assert!(!session.complete(first, stale).await);

        let snap = session.snapshot().await;
        assert_eq!(snap.identification.unwrap().record.name(), Some("Fresh"));
    }

    #[tokio::test]
    async fn slow_earlier_request_loses_race() {
        let session = Arc::new(IdentificationSession::new());
        session.select_image(photo()).await;

        let slow = PlantIdentifier::new(Arc::new(
            MockProvider::with_response("name: Slow").with_delay(Duration::from_millis(200)),
        ));
        let fast = PlantIdentifier::new(Arc::new(MockProvider::with_response("name: Fast")));

        let s = session.clone();
        let slow_task = tokio::spawn(async move { s.run(&slow).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(session.run(&fast).await.unwrap());
        assert!(!slow_task.await.unwrap().unwrap());

        let snap = session.snapshot().await;
        assert_eq!(snap.identification.unwrap().record.name(), Some("Fast"));
    }
}
