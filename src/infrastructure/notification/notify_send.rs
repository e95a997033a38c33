//! Desktop notifications through the `notify-send` binary

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{Notice, NotificationError, Notifier};

use super::{APP_NAME, EXPIRE, SEND_TIMEOUT};

const NOTIFY_SEND: &str = "notify-send";

/// Fallback for sessions where the D-Bus connection from this process fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifySendNotifier;

impl NotifySendNotifier {
    pub fn new() -> Self {
        Self
    }
}

fn arguments(notice: &Notice) -> Vec<String> {
    vec![
        format!("--app-name={}", APP_NAME),
        format!("--icon={}", notice.kind.icon_name()),
        format!("--expire-time={}", EXPIRE.as_millis()),
        format!("--category={}", notice.kind.category()),
        "--".to_string(),
        notice.title.clone(),
        notice.body.clone(),
    ]
}

#[async_trait]
impl Notifier for NotifySendNotifier {
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
        let mut child = Command::new(NOTIFY_SEND)
            .args(arguments(notice))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => NotificationError::Unavailable {
                    backend: NOTIFY_SEND,
                },
                _ => NotificationError::SendFailed(e.to_string()),
            })?;

        let status = match tokio::time::timeout(SEND_TIMEOUT, child.wait()).await {
            Ok(status) => status.map_err(|e| NotificationError::SendFailed(e.to_string()))?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(NotificationError::SendFailed(format!(
                    "{} did not finish within {}s",
                    NOTIFY_SEND,
                    SEND_TIMEOUT.as_secs()
                )));
            }
        };

        if status.success() {
            Ok(())
        } else {
            Err(NotificationError::SendFailed(format!(
                "{} exited with {}",
                NOTIFY_SEND, status
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_end_with_text_after_separator() {
        let args = arguments(&Notice::failed("--not-a-flag"));
        assert_eq!(args[0], "--app-name=SnapPaste");
        assert_eq!(args[1], "--icon=dialog-error");
        assert_eq!(args[2], "--expire-time=3000");
        assert_eq!(args[3], "--category=transfer.error");
        assert_eq!(&args[4..], ["--", "Paste failed", "--not-a-flag"]);
    }
}
