//! In-process clipboard owner using arboard
//!
//! On X11 and Wayland the clipboard is served by whoever owns it, so the
//! handle is kept alive after a successful write instead of being dropped.

use std::borrow::Cow;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::ports::{ClipboardStrategy, StrategyError};
use crate::domain::image::{ClipboardFormat, NormalizedImage};

/// Clipboard strategy writing raw RGBA pixels through arboard
#[derive(Clone, Default)]
pub struct ArboardStrategy {
    owner: Arc<Mutex<Option<arboard::Clipboard>>>,
}

impl ArboardStrategy {
    /// Create a new arboard strategy; the clipboard is opened lazily
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClipboardStrategy for ArboardStrategy {
    fn name(&self) -> &'static str {
        "arboard"
    }

    fn format(&self) -> ClipboardFormat {
        ClipboardFormat::Rgba
    }

    async fn commit(&self, image: &NormalizedImage) -> Result<(), StrategyError> {
        let owner = Arc::clone(&self.owner);
        let width = image.width() as usize;
        let height = image.height() as usize;
        let pixels = image.bytes().to_vec();

        // arboard operations are blocking, so run in spawn_blocking
        tokio::task::spawn_blocking(move || {
            let mut slot = owner
                .lock()
                .map_err(|_| StrategyError::Failed("clipboard owner lock poisoned".into()))?;

            if slot.is_none() {
                let clipboard = arboard::Clipboard::new()
                    .map_err(|e| StrategyError::Unavailable(e.to_string()))?;
                *slot = Some(clipboard);
            }
            let Some(clipboard) = slot.as_mut() else {
                return Err(StrategyError::Unavailable("clipboard not open".into()));
            };

            let result = clipboard.set_image(arboard::ImageData {
                width,
                height,
                bytes: Cow::Owned(pixels),
            });

            if let Err(e) = result {
                // A broken connection is reopened on the next paste
                *slot = None;
                return Err(StrategyError::Failed(e.to_string()));
            }
            Ok(())
        })
        .await
        .map_err(|e| StrategyError::Failed(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_wants_raw_pixels() {
        let strategy = ArboardStrategy::new();
        assert_eq!(strategy.name(), "arboard");
        assert_eq!(strategy.format(), ClipboardFormat::Rgba);
    }

    #[test]
    fn clipboard_is_opened_lazily() {
        let strategy = ArboardStrategy::default();
        assert!(strategy.owner.lock().unwrap().is_none());
    }
}
