//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: OS clipboard
//! strategies, interface enumerators, notifications and the config file.

pub mod clipboard;
pub mod config;
pub mod network;
pub mod notification;

// Re-export adapters
pub use clipboard::{create_strategy_chain, ArboardStrategy, HelperCommand, HelperStrategy};
pub use config::XdgConfigStore;
pub use network::{create_enumerator, LocalIpProbe};
pub use notification::{create_notifier, FallbackNotifier, NotifyRustNotifier, NotifySendNotifier};
