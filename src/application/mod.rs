//! Application layer - Use cases and port interfaces
//!
//! Contains the core business operations and trait definitions
//! for external system interactions.

pub mod committer;
pub mod paste;
pub mod ports;
pub mod selector;

// Re-export use cases
pub use committer::{
    ClipboardCommitter, CommitError, CommitReceipt, LinkCondition, StrategyAttempt, StrategyChain,
    CLIPBOARD_LOCK,
};
pub use paste::{PasteError, PasteImageUseCase, PasteOutput};
pub use selector::{InterfaceReport, InterfaceSelector};
