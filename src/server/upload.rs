//! Multipart parsing for `POST /api/v1/generate`.

use crate::ai::mime::resolve_upload_mime;
use crate::app::PhotoUpload;
use crate::models::EventDetails;
use crate::{Error, Result};
use actix_multipart::{Field, Multipart};
use futures::StreamExt;
use tracing::{error, info};

pub const TOO_BIG_MESSAGE: &str =
    "The uploaded file is too big. Please choose an image that is less than 10MB in size.";

/// Parsed `data` and `image` parts of a generate request.
#[derive(Debug)]
pub struct GenerateForm {
    pub event: EventDetails,
    pub photo: PhotoUpload,
}

struct ImagePart {
    filename: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// Read the form, failing as soon as more than `limit` bytes have arrived.
pub async fn read_generate_form(mut payload: Multipart, limit: usize) -> Result<GenerateForm> {
    let mut data: Option<Vec<u8>> = None;
    let mut image: Option<ImagePart> = None;
    let mut received = 0usize;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            error!("Failed to parse multipart form: {}", e);
            Error::Validation("Invalid multipart form data.".to_string())
        })?;

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("data") => {
                data = Some(read_field(&mut field, &mut received, limit).await?);
            }
            Some("image") => {
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .map(str::to_string);
                let content_type = field.content_type().map(|m| m.essence_str().to_string());
                let bytes = read_field(&mut field, &mut received, limit).await?;
                image = Some(ImagePart {
                    filename,
                    content_type,
                    bytes,
                });
            }
            _ => {
                // Skip unknown fields, still counting them against the limit.
                read_field(&mut field, &mut received, limit).await?;
            }
        }
    }

    let event: EventDetails = data
        .as_deref()
        .ok_or_else(|| "missing 'data' field".to_string())
        .and_then(|raw| serde_json::from_slice(raw).map_err(|e| e.to_string()))
        .map_err(|e| {
            error!("Failed to unmarshal JSON data: {}", e);
            Error::Validation("Invalid JSON data provided.".to_string())
        })?;

    let image = image.filter(|part| !part.bytes.is_empty()).ok_or_else(|| {
        error!("Failed to get image from form");
        Error::Validation("Invalid image file provided.".to_string())
    })?;

    let mime_type = resolve_upload_mime(
        image.filename.as_deref(),
        image.content_type.as_deref(),
        &image.bytes,
    );
    info!(
        filename = ?image.filename,
        size = image.bytes.len(),
        mime_type = %mime_type,
        "Image received"
    );

    Ok(GenerateForm {
        event,
        photo: PhotoUpload {
            bytes: image.bytes,
            mime_type,
        },
    })
}

async fn read_field(field: &mut Field, received: &mut usize, limit: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| {
            error!("Error reading multipart chunk: {}", e);
            Error::Validation("Invalid multipart form data.".to_string())
        })?;

        *received += chunk.len();
        if *received > limit {
            error!("Upload exceeded {} bytes", limit);
            return Err(Error::Validation(TOO_BIG_MESSAGE.to_string()));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}
