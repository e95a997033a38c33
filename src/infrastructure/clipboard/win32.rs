//! Native Windows clipboard strategy (`CF_DIB`)

use std::ptr;
use std::time::Duration;

use async_trait::async_trait;
use windows_sys::Win32::System::DataExchange::{
    CloseClipboard, EmptyClipboard, OpenClipboard, SetClipboardData,
};
use windows_sys::Win32::Foundation::HGLOBAL;
use windows_sys::Win32::System::Memory::{
    GlobalAlloc, GlobalFree, GlobalLock, GlobalUnlock, GMEM_MOVEABLE,
};
use windows_sys::Win32::System::Ole::CF_DIB;

use crate::application::ports::{ClipboardStrategy, StrategyError};
use crate::domain::image::{ClipboardFormat, NormalizedImage};

/// Another process may hold the clipboard open briefly
const OPEN_ATTEMPTS: u32 = 5;
const OPEN_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Writes a device-independent bitmap with the Win32 clipboard API
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32DibStrategy;

impl Win32DibStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ClipboardStrategy for Win32DibStrategy {
    fn name(&self) -> &'static str {
        "win32-cf-dib"
    }

    fn format(&self) -> ClipboardFormat {
        ClipboardFormat::Dib
    }

    async fn commit(&self, image: &NormalizedImage) -> Result<(), StrategyError> {
        let dib = image.bytes().to_vec();

        tokio::task::spawn_blocking(move || set_dib(&dib))
            .await
            .map_err(|e| StrategyError::Failed(format!("Task join error: {}", e)))?
    }
}

fn set_dib(dib: &[u8]) -> Result<(), StrategyError> {
    // Everything that can fail before the clipboard is cleared happens first
    let buffer = GlobalBuffer::filled(dib)?;

    open_clipboard()?;
    // SAFETY: the clipboard is open on this thread until CloseClipboard.
    let result = unsafe { replace_contents(buffer) };
    unsafe {
        CloseClipboard();
    }
    result
}

fn open_clipboard() -> Result<(), StrategyError> {
    for attempt in 1..=OPEN_ATTEMPTS {
        // SAFETY: a null owner window is permitted.
        if unsafe { OpenClipboard(ptr::null_mut()) } != 0 {
            return Ok(());
        }
        log::debug!("OpenClipboard attempt {} failed", attempt);
        std::thread::sleep(OPEN_RETRY_DELAY);
    }
    Err(StrategyError::Failed(format!(
        "OpenClipboard failed: {}",
        std::io::Error::last_os_error()
    )))
}

/// # Safety
/// The caller must have the clipboard open.
unsafe fn replace_contents(buffer: GlobalBuffer) -> Result<(), StrategyError> {
    if EmptyClipboard() == 0 {
        return Err(last_error("EmptyClipboard"));
    }

    // On success the clipboard owns the memory.
    if SetClipboardData(u32::from(CF_DIB), buffer.handle).is_null() {
        let err = last_error("SetClipboardData");
        log::warn!("Clipboard was cleared but the image could not be set");
        return Err(err);
    }
    buffer.release();

    Ok(())
}

/// Movable global memory holding a copy of the DIB; freed on drop unless
/// handed to the clipboard
struct GlobalBuffer {
    handle: HGLOBAL,
}

impl GlobalBuffer {
    fn filled(bytes: &[u8]) -> Result<Self, StrategyError> {
        // SAFETY: plain allocation; the handle is owned by the returned value.
        let handle = unsafe { GlobalAlloc(GMEM_MOVEABLE, bytes.len()) };
        if handle.is_null() {
            return Err(last_error("GlobalAlloc"));
        }
        let buffer = Self { handle };

        // SAFETY: the block is at least `bytes.len()` long and stays locked
        // for the copy.
        unsafe {
            let dest = GlobalLock(buffer.handle);
            if dest.is_null() {
                return Err(last_error("GlobalLock"));
            }
            ptr::copy_nonoverlapping(bytes.as_ptr(), dest.cast::<u8>(), bytes.len());
            GlobalUnlock(buffer.handle);
        }
        Ok(buffer)
    }

    fn release(self) {
        std::mem::forget(self);
    }
}

impl Drop for GlobalBuffer {
    fn drop(&mut self) {
        // SAFETY: the handle came from GlobalAlloc and was not given away.
        unsafe {
            GlobalFree(self.handle);
        }
    }
}

fn last_error(call: &str) -> StrategyError {
    StrategyError::Failed(format!("{} failed: {}", call, std::io::Error::last_os_error()))
}
