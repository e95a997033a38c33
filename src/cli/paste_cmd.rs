//! Paste command handler: run a local file through the upload pipeline

use std::path::Path;

use thiserror::Error;

use crate::application::PasteError;
use crate::domain::config::AppConfig;
use crate::domain::error::{PayloadError, UnsupportedPlatformError};
use crate::domain::image::ImagePayload;

use super::app::build_paste;
use super::presenter::Presenter;

/// Paste command errors
#[derive(Debug, Error)]
pub enum PasteCommandError {
    #[error("Cannot read {path}: {message}")]
    Read { path: String, message: String },

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Platform(#[from] UnsupportedPlatformError),

    #[error(transparent)]
    Paste(#[from] PasteError),
}

/// Read `file` and put it on the clipboard
pub async fn handle_paste_command(
    config: &AppConfig,
    file: &Path,
    presenter: &Presenter,
) -> Result<(), PasteCommandError> {
    let data = tokio::fs::read(file)
        .await
        .map_err(|e| PasteCommandError::Read {
            path: file.display().to_string(),
            message: e.to_string(),
        })?;

    let payload = ImagePayload::new(data, mime_from_extension(file).map(str::to_string))?;
    presenter.info(&format!(
        "Read {} ({})",
        file.display(),
        payload.human_readable_size()
    ));

    let paste = build_paste(config)?;
    let output = paste.execute(payload).await?;

    for attempt in &output.receipt.failed_attempts {
        presenter.warn(&format!("{} failed: {}", attempt.strategy, attempt.error));
    }
    presenter.success(&format!(
        "Copied {}x{} image to clipboard via {} ({} bytes as {})",
        output.width,
        output.height,
        output.receipt.strategy,
        output.receipt.bytes,
        output.receipt.format
    ));

    Ok(())
}

/// Format hint from the file name, if it names a common image type
fn mime_from_extension(file: &Path) -> Option<&'static str> {
    let ext = file.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}
