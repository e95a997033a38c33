//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod clipboard;
pub mod config;
pub mod network;
pub mod notifier;

// Re-export common types
pub use clipboard::{ClipboardStrategy, StrategyError};
pub use config::ConfigStore;
pub use network::{EnumerationError, InterfaceEnumerator, RouteProbe};
pub use notifier::{NotificationError, Notice, NoticeKind, Notifier, SilentNotifier};
