//! Native macOS clipboard strategy (`NSPasteboard`, TIFF)

use async_trait::async_trait;
use objc2::rc::autoreleasepool;
use objc2_app_kit::{NSPasteboard, NSPasteboardTypeTIFF};
use objc2_foundation::NSData;

use crate::application::ports::{ClipboardStrategy, StrategyError};
use crate::domain::image::{ClipboardFormat, NormalizedImage};

/// Writes TIFF data to the general pasteboard
#[derive(Debug, Clone, Copy, Default)]
pub struct PasteboardStrategy;

impl PasteboardStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClipboardStrategy for PasteboardStrategy {
    fn name(&self) -> &'static str {
        "nspasteboard"
    }

    fn format(&self) -> ClipboardFormat {
        ClipboardFormat::Tiff
    }

    async fn commit(&self, image: &NormalizedImage) -> Result<(), StrategyError> {
        let tiff = image.bytes().to_vec();

        tokio::task::spawn_blocking(move || set_tiff(&tiff))
            .await
            .map_err(|e| StrategyError::Failed(format!("Task join error: {}", e)))?
    }
}

fn set_tiff(tiff: &[u8]) -> Result<(), StrategyError> {
    autoreleasepool(|_| {
        let pasteboard = unsafe { NSPasteboard::generalPasteboard() };
        let data = NSData::with_bytes(tiff);

        // SAFETY: NSPasteboardTypeTIFF is an immutable AppKit constant.
        let written = unsafe {
            pasteboard.clearContents();
            pasteboard.setData_forType(Some(&*data), NSPasteboardTypeTIFF)
        };

        if written {
            Ok(())
        } else {
            Err(StrategyError::Failed(
                "NSPasteboard rejected TIFF data".into(),
            ))
        }
    })
}
