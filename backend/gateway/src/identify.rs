//! Identification endpoint (`POST /api`).

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use florascope_core::{ImageInput, PlantRecord};
use serde::Serialize;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Multipart field carrying the photo.
pub const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize)]
pub struct IdentifyResponse {
    /// Provider answer, verbatim.
    pub result: String,
    pub record: PlantRecord,
}

/// Handler for `POST /api`.
pub async fn identify_plant(
    State(state): State<GatewayState>,
    multipart: Multipart,
) -> Result<Json<IdentifyResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    async move {
        info!("API route called");
        let image = read_image(multipart).await?;
        let identification = state.identifier.identify_record(image.as_ref()).await?;
        info!(keys = identification.record.len(), "Identification complete");
        Ok(Json(IdentifyResponse {
            result: identification.result.into_string(),
            record: identification.record,
        }))
    }
    .instrument(info_span!("identify", %request_id))
    .await
}

/// Pull the `image` part out of the form. Other parts are ignored; a missing
/// part is `Ok(None)` so the identifier reports it uniformly.
async fn read_image(mut multipart: Multipart) -> Result<Option<ImageInput>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() != Some(IMAGE_FIELD) {
            debug!(field = ?field.name(), "Skipping form field");
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(upload_error)?;

        let mut image = ImageInput::new(data, mime_type);
        if let Some(name) = file_name {
            image = image.with_file_name(name);
        }
        return Ok(Some(image));
    }
    Ok(None)
}

fn upload_error(err: MultipartError) -> ApiError {
    ApiError::BadRequest {
        status: err.status(),
        message: err.body_text(),
    }
}
