//! Clipboard committer
//!
//! Walks the per-OS strategy chain under one process-wide lock. Each
//! strategy receives the image in the layout it asks for; layouts are
//! encoded on first use and reused by later strategies in the same commit.
//!
//! The walk runs on its own task that owns the lock guard, so a caller
//! dropping its future (a client disconnecting) never releases the lock
//! while a native clipboard call is still running.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::error::ErrorKind;
use crate::domain::image::{ClipboardFormat, DecodedImage, ImageNormalizer, NormalizedImage};

use super::ports::{ClipboardStrategy, StrategyError};

/// Serialises every clipboard write in the process
pub static CLIPBOARD_LOCK: Mutex<()> = Mutex::const_new(());

/// When a chain link is tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCondition {
    /// Whenever every earlier link failed
    Always,
    /// Only when the link tried just before reported its tool as missing
    PreviousToolMissing,
}

struct ChainLink {
    condition: LinkCondition,
    strategy: Box<dyn ClipboardStrategy>,
}

/// Ordered clipboard strategies, fixed at startup
pub struct StrategyChain {
    links: Vec<ChainLink>,
}

impl StrategyChain {
    /// Start a chain with its preferred strategy
    pub fn starting_with(strategy: impl ClipboardStrategy + 'static) -> Self {
        Self {
            links: vec![ChainLink {
                condition: LinkCondition::Always,
                strategy: Box::new(strategy),
            }],
        }
    }

    /// Append a strategy tried whenever everything before it failed
    pub fn then(self, strategy: impl ClipboardStrategy + 'static) -> Self {
        self.push(LinkCondition::Always, Box::new(strategy))
    }

    /// Append a strategy tried only when the previous one's tool is missing
    pub fn or_if_missing(self, strategy: impl ClipboardStrategy + 'static) -> Self {
        self.push(LinkCondition::PreviousToolMissing, Box::new(strategy))
    }

    fn push(mut self, condition: LinkCondition, strategy: Box<dyn ClipboardStrategy>) -> Self {
        self.links.push(ChainLink {
            condition,
            strategy,
        });
        self
    }

    /// Strategy names in the order they are tried
    pub fn names(&self) -> Vec<&'static str> {
        self.links.iter().map(|l| l.strategy.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl std::fmt::Debug for StrategyChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// One failed strategy within a commit
#[derive(Debug, Clone)]
pub struct StrategyAttempt {
    pub strategy: &'static str,
    pub error: StrategyError,
}

/// Successful commit
#[derive(Debug, Clone)]
pub struct CommitReceipt {
    /// Name of the strategy that took the image
    pub strategy: &'static str,
    /// Layout handed to the clipboard
    pub format: ClipboardFormat,
    /// Number of bytes the clipboard received
    pub bytes: usize,
    /// Strategies that failed before the winner
    pub failed_attempts: Vec<StrategyAttempt>,
}

/// Committer errors
#[derive(Debug, Clone, Error)]
pub enum CommitError {
    #[error("Clipboard is busy with another image")]
    Busy,

    #[error("All {} clipboard strategies failed; last error: {last}", .attempts.len())]
    CommitFailed {
        attempts: Vec<StrategyAttempt>,
        #[source]
        last: StrategyError,
    },

    #[error("Clipboard task failed: {0}")]
    Aborted(String),
}

impl CommitError {
    /// Machine-readable kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Busy => ErrorKind::ClipboardBusy,
            Self::CommitFailed { .. } | Self::Aborted(_) => ErrorKind::ClipboardCommitFailed,
        }
    }

    /// Kind of the underlying cause: the last strategy's error for a
    /// failed chain
    pub fn root_kind(&self) -> ErrorKind {
        match self {
            Self::Busy => ErrorKind::ClipboardBusy,
            Self::CommitFailed { last, .. } => last.kind(),
            Self::Aborted(_) => ErrorKind::ClipboardCommitFailed,
        }
    }
}

/// Commits decoded images through a strategy chain
pub struct ClipboardCommitter {
    walker: Arc<ChainWalker>,
    lock: &'static Mutex<()>,
}

/// Chain plus encoder, shared with the task doing the walk
struct ChainWalker {
    chain: StrategyChain,
    normalizer: ImageNormalizer,
}

impl ClipboardCommitter {
    /// Create a committer guarded by [`CLIPBOARD_LOCK`]
    pub fn new(chain: StrategyChain) -> Self {
        Self::with_lock(chain, &CLIPBOARD_LOCK)
    }

    /// Create a committer guarded by a specific lock
    pub fn with_lock(chain: StrategyChain, lock: &'static Mutex<()>) -> Self {
        Self {
            walker: Arc::new(ChainWalker {
                chain,
                normalizer: ImageNormalizer::new(),
            }),
            lock,
        }
    }

    /// The chain this committer walks
    pub fn chain(&self) -> &StrategyChain {
        &self.walker.chain
    }

    /// Commit an image, waiting for any commit already in progress
    pub async fn commit(&self, image: Arc<DecodedImage>) -> Result<CommitReceipt, CommitError> {
        let guard = self.lock.lock().await;
        self.walk_detached(guard, image).await
    }

    /// Commit an image, failing with [`CommitError::Busy`] instead of
    /// waiting when another commit holds the clipboard
    pub async fn try_commit(&self, image: Arc<DecodedImage>) -> Result<CommitReceipt, CommitError> {
        let guard = self.lock.try_lock().map_err(|_| CommitError::Busy)?;
        self.walk_detached(guard, image).await
    }

    /// Walk the chain on a spawned task that holds `guard` until it finishes
    async fn walk_detached(
        &self,
        guard: MutexGuard<'static, ()>,
        image: Arc<DecodedImage>,
    ) -> Result<CommitReceipt, CommitError> {
        let walker = Arc::clone(&self.walker);
        let task = tokio::spawn(async move {
            let _guard = guard;
            walker.walk_chain(image).await
        });
        task.await
            .map_err(|e| CommitError::Aborted(e.to_string()))?
    }
}

impl ChainWalker {
    async fn walk_chain(&self, image: Arc<DecodedImage>) -> Result<CommitReceipt, CommitError> {
        let mut encoded: HashMap<ClipboardFormat, Arc<NormalizedImage>> = HashMap::new();
        let mut attempts: Vec<StrategyAttempt> = Vec::new();
        let mut last: Option<StrategyError> = None;

        for link in &self.chain.links {
            let name = link.strategy.name();

            if link.condition == LinkCondition::PreviousToolMissing
                && !last.as_ref().is_some_and(StrategyError::is_tool_missing)
            {
                log::debug!("Skipping {}: previous strategy's tool is installed", name);
                continue;
            }

            let format = link.strategy.format();
            let result = match self.encoded(&mut encoded, &image, format).await {
                Ok(normalized) => link.strategy.commit(&normalized).await.map(|()| normalized),
                Err(e) => Err(e),
            };

            match result {
                Ok(normalized) => {
                    log::info!(
                        "Clipboard set via {} ({}, {}x{}, {} bytes)",
                        name,
                        format,
                        normalized.width(),
                        normalized.height(),
                        normalized.len()
                    );
                    return Ok(CommitReceipt {
                        strategy: name,
                        format,
                        bytes: normalized.len(),
                        failed_attempts: attempts,
                    });
                }
                Err(error) => {
                    log::warn!("Clipboard strategy {} failed: {}", name, error);
                    attempts.push(StrategyAttempt {
                        strategy: name,
                        error: error.clone(),
                    });
                    last = Some(error);
                }
            }
        }

        let last =
            last.unwrap_or_else(|| StrategyError::Unavailable("no strategy was tried".into()));
        Err(CommitError::CommitFailed { attempts, last })
    }

    /// Fetch the image in `format`, encoding it on a blocking thread the
    /// first time it is requested
    async fn encoded(
        &self,
        cache: &mut HashMap<ClipboardFormat, Arc<NormalizedImage>>,
        image: &Arc<DecodedImage>,
        format: ClipboardFormat,
    ) -> Result<Arc<NormalizedImage>, StrategyError> {
        if let Some(hit) = cache.get(&format) {
            return Ok(Arc::clone(hit));
        }

        let normalizer = self.normalizer;
        let source = Arc::clone(image);
        let normalized = tokio::task::spawn_blocking(move || normalizer.normalize(&source, format))
            .await
            .map_err(|e| StrategyError::Failed(format!("encoder task failed: {}", e)))??;

        let normalized = Arc::new(normalized);
        cache.insert(format, Arc::clone(&normalized));
        Ok(normalized)
    }
}
