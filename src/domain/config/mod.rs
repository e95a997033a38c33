//! User configuration

mod app_config;

pub use app_config::{AppConfig, NetworkConfig, DEFAULT_BIND, DEFAULT_MAX_UPLOAD_MB, DEFAULT_PORT};
