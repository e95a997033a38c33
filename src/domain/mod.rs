//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod duration;
pub mod error;
pub mod image;
pub mod network;

// Re-export common types
pub use config::AppConfig;
pub use duration::Duration;
pub use error::*;
pub use self::image::{ClipboardFormat, ImageNormalizer, ImagePayload, NormalizedImage};
pub use network::{InterfaceKeywords, NetworkInterface, Selection, SelectionRule};
