//! Desktop notice port

use async_trait::async_trait;
use thiserror::Error;

/// Notification errors
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("{backend} is not available")]
    Unavailable { backend: &'static str },

    #[error("Failed to show notification: {0}")]
    SendFailed(String),
}

/// What a notice reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// An image landed on the clipboard
    Pasted,
    /// An upload arrived but the clipboard refused it
    Failed,
}

impl NoticeKind {
    /// freedesktop icon name
    pub const fn icon_name(&self) -> &'static str {
        match self {
            Self::Pasted => "image-x-generic",
            Self::Failed => "dialog-error",
        }
    }

    /// freedesktop notification category
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Pasted => "transfer.complete",
            Self::Failed => "transfer.error",
        }
    }
}

/// A short desktop notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
}

impl Notice {
    /// Confirmation for a committed image
    pub fn pasted(width: u32, height: u32, human_size: &str) -> Self {
        Self {
            kind: NoticeKind::Pasted,
            title: "Image copied".to_string(),
            body: format!("{}x{} image ({}) ready to paste", width, height, human_size),
        }
    }

    /// Warning that a received image never reached the clipboard
    pub fn failed(reason: &str) -> Self {
        Self {
            kind: NoticeKind::Failed,
            title: "Paste failed".to_string(),
            body: reason.to_string(),
        }
    }
}

/// Port for desktop notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show `notice`; callers treat failure as non-fatal
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError>;
}

#[async_trait]
impl Notifier for Box<dyn Notifier> {
    async fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
        self.as_ref().notify(notice).await
    }
}

/// Notifier that discards everything, used when notifications are off
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

#[async_trait]
impl Notifier for SilentNotifier {
    async fn notify(&self, _notice: &Notice) -> Result<(), NotificationError> {
        Ok(())
    }
}
