//! Notification infrastructure module
//!
//! Uses notify-rust, falling back to the notify-send binary when the
//! notification service cannot be reached directly.

mod notify_rust;
mod notify_send;

pub use self::notify_rust::NotifyRustNotifier;
pub use notify_send::NotifySendNotifier;

use async_trait::async_trait;

use crate::application::ports::{Notice, NotificationError, Notifier, SilentNotifier};

use std::time::Duration;

/// Application name shown on notifications
const APP_NAME: &str = "SnapPaste";

/// How long a notice stays on screen
const EXPIRE: Duration = Duration::from_secs(3);

/// Upper bound on delivering one notification
const SEND_TIMEOUT: Duration = Duration::from_secs(2);

/// Tries a primary notifier, then a secondary one
pub struct FallbackNotifier<P, S>
where
    P: Notifier,
    S: Notifier,
{
    primary: P,
    secondary: S,
}

impl<P, S> FallbackNotifier<P, S>
where
    P: Notifier,
    S: Notifier,
{
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl<P, S> Notifier for FallbackNotifier<P, S>
where
    P: Notifier,
    S: Notifier,
{
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
        match self.primary.notify(notice).await {
            Ok(()) => Ok(()),
            Err(e) => {
                log::debug!("Primary notifier failed ({}), trying fallback", e);
                self.secondary.notify(notice).await
            }
        }
    }
}

/// Create the notifier for the current platform
///
/// Returns a notifier that does nothing when notifications are disabled.
/// `notify-send` only backs up notify-rust on freedesktop systems.
pub fn create_notifier(enabled: bool) -> Box<dyn Notifier> {
    if !enabled {
        return Box::new(SilentNotifier);
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    return Box::new(FallbackNotifier::new(
        NotifyRustNotifier::new(),
        NotifySendNotifier::new(),
    ));

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    Box::new(NotifyRustNotifier::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Stub {
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Notifier for Stub {
        async fn notify(&self, _notice: &Notice) -> Result<(), NotificationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(NotificationError::SendFailed("no bus".into()))
            } else {
                Ok(())
            }
        }
    }

    fn stub(fail: bool) -> (Stub, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Stub {
                fail,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    #[tokio::test]
    async fn secondary_only_used_on_failure() {
        let (primary, primary_calls) = stub(false);
        let (secondary, secondary_calls) = stub(false);
        let notifier = FallbackNotifier::new(primary, secondary);

        notifier
            .notify(&Notice::pasted(8, 8, "1 KB"))
            .await
            .unwrap();

        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn falls_back_when_primary_fails() {
        let (primary, _) = stub(true);
        let (secondary, secondary_calls) = stub(false);
        let notifier = FallbackNotifier::new(primary, secondary);

        assert!(notifier
            .notify(&Notice::pasted(8, 8, "1 KB"))
            .await
            .is_ok());
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disabled_notifier_is_silent() {
        let notifier = create_notifier(false);
        assert!(notifier
            .notify(&Notice::failed("xclip not found"))
            .await
            .is_ok());
    }
}
