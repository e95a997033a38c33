//! Clipboard infrastructure module
//!
//! Builds the per-OS strategy chain: a native API first, then helper
//! processes. The chain is fixed once at startup.

mod arboard;
mod helper;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(windows)]
mod win32;

pub use self::arboard::ArboardStrategy;
pub use helper::{HelperCommand, HelperStrategy};
#[cfg(target_os = "macos")]
pub use macos::PasteboardStrategy;
#[cfg(windows)]
pub use win32::Win32DibStrategy;

use crate::application::StrategyChain;
use crate::domain::duration::Duration;
use crate::domain::error::UnsupportedPlatformError;

/// Create the strategy chain for the current platform
///
/// `helper_timeout` bounds every helper process in the chain.
#[cfg(windows)]
pub fn create_strategy_chain(
    helper_timeout: Duration,
) -> Result<StrategyChain, UnsupportedPlatformError> {
    Ok(StrategyChain::starting_with(Win32DibStrategy::new())
        .then(HelperStrategy::powershell(helper_timeout.as_std())))
}

/// Create the strategy chain for the current platform
///
/// `helper_timeout` bounds every helper process in the chain.
#[cfg(target_os = "macos")]
pub fn create_strategy_chain(
    helper_timeout: Duration,
) -> Result<StrategyChain, UnsupportedPlatformError> {
    Ok(StrategyChain::starting_with(PasteboardStrategy::new())
        .then(HelperStrategy::osascript(helper_timeout.as_std())))
}

/// Create the strategy chain for the current platform
///
/// `helper_timeout` bounds every helper process in the chain. `wl-copy` is
/// only part of the chain in Wayland sessions.
#[cfg(all(unix, not(target_os = "macos")))]
pub fn create_strategy_chain(
    helper_timeout: Duration,
) -> Result<StrategyChain, UnsupportedPlatformError> {
    let timeout = helper_timeout.as_std();
    let mut chain = StrategyChain::starting_with(ArboardStrategy::new());

    if is_wayland_session() {
        chain = chain.then(HelperStrategy::wl_copy(timeout));
    }

    Ok(chain
        .then(HelperStrategy::xclip(timeout))
        .or_if_missing(HelperStrategy::xsel(timeout)))
}

/// Create the strategy chain for the current platform
#[cfg(not(any(windows, unix)))]
pub fn create_strategy_chain(
    _helper_timeout: Duration,
) -> Result<StrategyChain, UnsupportedPlatformError> {
    Err(UnsupportedPlatformError::current())
}

#[cfg(all(unix, not(target_os = "macos")))]
fn is_wayland_session() -> bool {
    std::env::var_os("WAYLAND_DISPLAY").is_some_and(|v| !v.is_empty())
}
