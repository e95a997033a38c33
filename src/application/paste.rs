//! Paste image use case
//!
//! Payload in, clipboard out: decode on a blocking worker, then hand the
//! decoded image to the committer.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::error::{DecodeError, ErrorKind, PayloadError};
use crate::domain::image::{ImageNormalizer, ImagePayload};

use super::committer::{ClipboardCommitter, CommitError, CommitReceipt};
use super::ports::{Notice, Notifier};

/// Errors from the paste use case
#[derive(Debug, Error)]
pub enum PasteError {
    #[error("Invalid payload: {0}")]
    Payload(#[from] PayloadError),

    #[error("Could not decode image: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error("Decoder task failed: {0}")]
    Worker(String),
}

impl PasteError {
    /// Machine-readable kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Payload(e) => e.kind(),
            Self::Decode(e) => e.kind(),
            Self::Commit(e) => e.kind(),
            Self::Worker(_) => ErrorKind::DecodeError,
        }
    }

    /// Kind of the underlying cause
    pub fn root_kind(&self) -> ErrorKind {
        match self {
            Self::Commit(e) => e.root_kind(),
            other => other.kind(),
        }
    }
}

/// Output from the paste use case
#[derive(Debug, Clone)]
pub struct PasteOutput {
    /// Size of the uploaded payload in bytes
    pub size: usize,
    /// Upload size in human-readable form
    pub human_size: String,
    pub width: u32,
    pub height: u32,
    pub receipt: CommitReceipt,
}

/// Decodes uploads and commits them to the clipboard
pub struct PasteImageUseCase<N>
where
    N: Notifier,
{
    committer: ClipboardCommitter,
    notifier: N,
    normalizer: ImageNormalizer,
    enable_notify: bool,
}

impl<N> PasteImageUseCase<N>
where
    N: Notifier,
{
    /// Create a new use case instance
    pub fn new(committer: ClipboardCommitter, notifier: N, enable_notify: bool) -> Self {
        Self {
            committer,
            notifier,
            normalizer: ImageNormalizer::new(),
            enable_notify,
        }
    }

    /// Names of the clipboard strategies, in the order they are tried
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.committer.chain().names()
    }

    /// Paste, queueing behind any paste already in progress
    pub async fn execute(&self, payload: ImagePayload) -> Result<PasteOutput, PasteError> {
        let size = payload.size_bytes();
        let human_size = payload.human_readable_size();

        let normalizer = self.normalizer;
        let decoded = tokio::task::spawn_blocking(move || normalizer.decode(payload))
            .await
            .map_err(|e| PasteError::Worker(e.to_string()))??;
        let (width, height) = (decoded.width(), decoded.height());
        let decoded = Arc::new(decoded);

        let receipt = match self.committer.commit(decoded).await {
            Ok(receipt) => receipt,
            Err(e) => {
                self.announce(Notice::failed(&e.to_string())).await;
                return Err(e.into());
            }
        };

        self.announce(Notice::pasted(width, height, &human_size)).await;

        Ok(PasteOutput {
            size,
            human_size,
            width,
            height,
            receipt,
        })
    }

    async fn announce(&self, notice: Notice) {
        if !self.enable_notify {
            return;
        }
        if let Err(e) = self.notifier.notify(&notice).await {
            log::warn!("Notification failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::committer::StrategyChain;
    use crate::application::ports::{
        ClipboardStrategy, NoticeKind, NotificationError, StrategyError,
    };
    use crate::domain::image::{ClipboardFormat, NormalizedImage};
    use async_trait::async_trait;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    static LOCK: Mutex<()> = Mutex::const_new(());

    struct CountingStrategy {
        calls: Arc<AtomicUsize>,
        outcome: Result<(), StrategyError>,
    }

    #[async_trait]
    impl ClipboardStrategy for CountingStrategy {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn format(&self) -> ClipboardFormat {
            ClipboardFormat::Dib
        }

        async fn commit(&self, _image: &NormalizedImage) -> Result<(), StrategyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notices: std::sync::Mutex<Vec<Notice>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, notice: &Notice) -> Result<(), NotificationError> {
            self.notices.lock().unwrap().push(notice.clone());
            Err(NotificationError::Unavailable { backend: "test" })
        }
    }

    fn use_case(
        outcome: Result<(), StrategyError>,
        notify: bool,
    ) -> (PasteImageUseCase<RecordingNotifier>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = StrategyChain::starting_with(CountingStrategy {
            calls: Arc::clone(&calls),
            outcome,
        });
        let committer = ClipboardCommitter::with_lock(chain, &LOCK);
        (
            PasteImageUseCase::new(committer, RecordingNotifier::default(), notify),
            calls,
        )
    }

    fn png_payload() -> ImagePayload {
        let img = RgbaImage::from_fn(24, 16, |x, y| {
            let noise = ((x * 37 + y * 91) % 251) as u8;
            Rgba([noise, (x * 10) as u8, (y * 10) as u8, 128])
        });
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        ImagePayload::new(bytes, Some("image/png".into())).unwrap()
    }

    #[tokio::test]
    async fn pastes_and_reports_dimensions() {
        let (use_case, calls) = use_case(Ok(()), false);
        let output = use_case.execute(png_payload()).await.unwrap();

        assert_eq!((output.width, output.height), (24, 16));
        assert_eq!(output.receipt.strategy, "counting");
        assert_eq!(output.receipt.format, ClipboardFormat::Dib);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn undecodable_payload_never_reaches_clipboard() {
        let (use_case, calls) = use_case(Ok(()), false);
        let payload = ImagePayload::new(vec![0x42; 400], None).unwrap();

        let err = use_case.execute(payload).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DecodeError);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn commit_failure_exposes_root_kind() {
        let (use_case, _) = use_case(Err(StrategyError::ToolMissing { tool: "xclip" }), false);
        let err = use_case.execute(png_payload()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ClipboardCommitFailed);
        assert_eq!(err.root_kind(), ErrorKind::ExternalToolMissing);
    }

    #[tokio::test]
    async fn notification_failure_is_not_fatal() {
        let (use_case, _) = use_case(Ok(()), true);
        let output = use_case.execute(png_payload()).await.unwrap();
        let notices = use_case.notifier.notices.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0], Notice::pasted(24, 16, &output.human_size));
    }

    #[tokio::test]
    async fn commit_failure_is_announced() {
        let (use_case, _) = use_case(Err(StrategyError::ToolMissing { tool: "xclip" }), true);
        assert!(use_case.execute(png_payload()).await.is_err());

        let notices = use_case.notifier.notices.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Failed);
    }

    #[tokio::test]
    async fn bad_upload_is_not_announced() {
        let (use_case, _) = use_case(Ok(()), true);
        let payload = ImagePayload::new(vec![0x42; 400], None).unwrap();
        assert!(use_case.execute(payload).await.is_err());
        assert!(use_case.notifier.notices.lock().unwrap().is_empty());
    }
}
