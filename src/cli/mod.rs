//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! and the subcommand runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod interfaces_cmd;
pub mod paste_cmd;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{
    build_paste, build_selector, load_merged_config, run_server, EXIT_ERROR, EXIT_SUCCESS,
    EXIT_USAGE_ERROR,
};
pub use args::{Cli, Commands, ConfigAction};
pub use config_cmd::handle_config_command;
pub use interfaces_cmd::handle_interfaces_command;
pub use paste_cmd::{handle_paste_command, PasteCommandError};
pub use presenter::Presenter;
