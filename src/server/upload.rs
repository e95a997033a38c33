//! Turning upload bodies into image payloads
//!
//! Accepted encodings, checked in this order: JSON with an `image` field
//! holding base64 or a data URI, an `image/*` body, a multipart field named
//! `image`, and finally any other raw body.

use futures_util::TryStreamExt;
use serde::Deserialize;
use thiserror::Error;
use warp::hyper::body::{Buf, Bytes};
use warp::multipart::FormData;

use crate::domain::error::{ErrorKind, PayloadError};
use crate::domain::image::ImagePayload;

/// Multipart field carrying the photo
pub const IMAGE_FIELD: &str = "image";

/// Upload decoding errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Missing 'image' field")]
    MissingField,

    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("Invalid multipart body: {0}")]
    InvalidMultipart(String),

    #[error("No image data received")]
    Empty,

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl UploadError {
    /// Machine-readable kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Payload(e) => e.kind(),
            _ => ErrorKind::InvalidPayload,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonUpload {
    image: Option<String>,
}

/// Build a payload from a non-multipart request body
pub fn payload_from_body(
    content_type: Option<&str>,
    body: Bytes,
) -> Result<ImagePayload, UploadError> {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match mime.as_deref() {
        Some(ct) if ct == "application/json" || ct.ends_with("+json") => {
            let upload: JsonUpload = serde_json::from_slice(&body)
                .map_err(|e| UploadError::InvalidJson(e.to_string()))?;
            let image = upload.image.ok_or(UploadError::MissingField)?;
            Ok(ImagePayload::from_base64(&image)?)
        }
        Some(ct) if ct.starts_with("image/") => {
            Ok(ImagePayload::new(body.to_vec(), Some(ct.to_string()))?)
        }
        _ => {
            if body.is_empty() {
                return Err(UploadError::Empty);
            }
            Ok(ImagePayload::new(body.to_vec(), None)?)
        }
    }
}

/// Read the `image` field of a multipart form
pub async fn payload_from_form(mut form: FormData) -> Result<ImagePayload, UploadError> {
    while let Some(part) = form
        .try_next()
        .await
        .map_err(|e| UploadError::InvalidMultipart(e.to_string()))?
    {
        if part.name() != IMAGE_FIELD {
            continue;
        }

        let mime = part
            .content_type()
            .filter(|ct| ct.starts_with("image/"))
            .map(str::to_string);

        let mut data = Vec::new();
        let mut stream = Box::pin(part.stream());
        while let Some(chunk) = stream
            .try_next()
            .await
            .map_err(|e| UploadError::InvalidMultipart(e.to_string()))?
        {
            data.extend_from_slice(chunk.chunk());
        }

        return Ok(ImagePayload::new(data, mime)?);
    }

    Err(UploadError::MissingField)
}
