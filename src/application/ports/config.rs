//! Settings persistence port

use std::path::Path;

use async_trait::async_trait;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Port for the user's persisted settings
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read the stored settings; no file means an empty layer
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Replace the stored settings
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Seed the store with defaults, refusing to overwrite an existing file
    async fn init(&self) -> Result<(), ConfigError>;

    fn path(&self) -> &Path;
}
