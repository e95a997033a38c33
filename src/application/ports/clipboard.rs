//! Clipboard strategy port interface

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::error::{DecodeError, ErrorKind};
use crate::domain::image::{ClipboardFormat, NormalizedImage};

/// Why one clipboard strategy could not commit an image.
///
/// These never reach callers of the committer directly; they are recorded
/// as attempts and the last one becomes the source of the commit failure.
#[derive(Debug, Clone, Error)]
pub enum StrategyError {
    #[error("{tool} not found")]
    ToolMissing { tool: &'static str },

    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("{tool} did not finish within {}s", .after.as_secs())]
    Timeout {
        tool: &'static str,
        after: Duration,
    },

    #[error("{tool} exited with {status}")]
    ExitStatus { tool: &'static str, status: String },

    #[error("Failed to encode image for clipboard: {0}")]
    Encode(#[from] DecodeError),

    #[error("Failed to set clipboard: {0}")]
    Failed(String),
}

impl StrategyError {
    /// Machine-readable kind
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ToolMissing { .. } => ErrorKind::ExternalToolMissing,
            Self::Timeout { .. } => ErrorKind::ClipboardTimeout,
            Self::Encode(_) => ErrorKind::DecodeError,
            Self::Unavailable(_) | Self::ExitStatus { .. } | Self::Failed(_) => {
                ErrorKind::ClipboardCommitFailed
            }
        }
    }

    /// Whether the strategy's external program is not installed
    pub const fn is_tool_missing(&self) -> bool {
        matches!(self, Self::ToolMissing { .. })
    }
}

/// One way of placing an image on the system clipboard
#[async_trait]
pub trait ClipboardStrategy: Send + Sync {
    /// Stable name used in logs and commit receipts
    fn name(&self) -> &'static str;

    /// The layout this strategy wants the image encoded in
    fn format(&self) -> ClipboardFormat;

    /// Place the encoded image on the clipboard.
    ///
    /// # Arguments
    /// * `image` - The image, already encoded in [`Self::format`]
    ///
    /// # Returns
    /// Ok(()) once the clipboard owns the image, error otherwise
    async fn commit(&self, image: &NormalizedImage) -> Result<(), StrategyError>;
}

/// Blanket implementation for boxed strategy types
#[async_trait]
impl ClipboardStrategy for Box<dyn ClipboardStrategy> {
    fn name(&self) -> &'static str {
        self.as_ref().name()
    }

    fn format(&self) -> ClipboardFormat {
        self.as_ref().format()
    }

    async fn commit(&self, image: &NormalizedImage) -> Result<(), StrategyError> {
        self.as_ref().commit(image).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            StrategyError::ToolMissing { tool: "xclip" }.kind(),
            ErrorKind::ExternalToolMissing
        );
        assert_eq!(
            StrategyError::Timeout {
                tool: "wl-copy",
                after: Duration::from_secs(10)
            }
            .kind(),
            ErrorKind::ClipboardTimeout
        );
        assert_eq!(
            StrategyError::Unavailable("no display".into()).kind(),
            ErrorKind::ClipboardCommitFailed
        );
    }

    #[test]
    fn timeout_message_names_tool() {
        let err = StrategyError::Timeout {
            tool: "powershell",
            after: Duration::from_secs(10),
        };
        assert_eq!(err.to_string(), "powershell did not finish within 10s");
    }

    #[test]
    fn only_tool_missing_is_missing() {
        assert!(StrategyError::ToolMissing { tool: "xclip" }.is_tool_missing());
        assert!(!StrategyError::Failed("boom".into()).is_tool_missing());
    }
}
