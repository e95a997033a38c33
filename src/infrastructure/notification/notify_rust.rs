//! Desktop notifications through notify-rust
//!
//! D-Bus on Linux/BSD, the native notification centres elsewhere.

use async_trait::async_trait;
use notify_rust::{Notification, Timeout};

use crate::application::ports::{Notice, NotificationError, Notifier};

use super::{APP_NAME, EXPIRE, SEND_TIMEOUT};

/// Native notifier; `show()` blocks, so it runs on a blocking worker
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifyRustNotifier;

impl NotifyRustNotifier {
    pub fn new() -> Self {
        Self
    }
}

fn build(notice: &Notice) -> Notification {
    let mut notification = Notification::new();
    notification
        .appname(APP_NAME)
        .summary(&notice.title)
        .body(&notice.body)
        .icon(notice.kind.icon_name())
        .timeout(Timeout::Milliseconds(EXPIRE.as_millis() as u32));

    #[cfg(all(unix, not(target_os = "macos")))]
    notification.hint(notify_rust::Hint::Category(notice.kind.category().to_string()));

    notification
}

#[async_trait]
impl Notifier for NotifyRustNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
        let notification = build(notice);
        let task = tokio::task::spawn_blocking(move || {
            notification
                .show()
                .map(|_| ())
                .map_err(|e| NotificationError::SendFailed(e.to_string()))
        });

        match tokio::time::timeout(SEND_TIMEOUT, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(NotificationError::SendFailed(join.to_string())),
            Err(_) => Err(NotificationError::SendFailed(format!(
                "no answer from notification service within {}s",
                SEND_TIMEOUT.as_secs()
            ))),
        }
    }
}
