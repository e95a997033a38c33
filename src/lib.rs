//! SnapPaste - phone photos into the desktop clipboard
//!
//! A small HTTP server on the LAN receives a photo from a phone browser,
//! decodes it, converts it into the layout the desktop clipboard expects,
//! and commits it through an ordered chain of clipboard strategies.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Image payloads and normalization, interface selection
//!   cascade, configuration, and errors
//! - **Application**: Use cases (paste, interface selection) and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (clipboard strategies, interface
//!   enumerators, notifications, config store)
//! - **Server**: The warp transfer endpoint
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod server;
