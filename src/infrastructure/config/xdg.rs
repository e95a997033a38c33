//! TOML settings file under the platform config directory
//!
//! `~/.config/snappaste/config.toml` on Linux, the equivalent
//! per-user location on macOS and Windows.

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

const APP_DIR: &str = "snappaste";
const FILE_NAME: &str = "config.toml";

/// Written above the serialized settings
const HEADER: &str =
    "# SnapPaste settings. CLI flags and SNAPPASTE_* variables override these.\n\n";

/// Config store backed by one TOML file
#[derive(Debug, Clone)]
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    pub fn new() -> Self {
        Self::with_path(default_path())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_error(&self, e: impl ToString) -> ConfigError {
        ConfigError::Read {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }

    fn write_error(&self, e: impl ToString) -> ConfigError {
        ConfigError::Write {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }

    fn decode(&self, content: &str) -> Result<AppConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: self.path.clone(),
            message: e.message().to_string(),
        })
    }

    fn encode(&self, config: &AppConfig) -> Result<String, ConfigError> {
        let body = toml::to_string_pretty(config).map_err(|e| self.write_error(e))?;
        Ok(format!("{}{}", HEADER, body))
    }

    /// Sibling path the new contents are staged in before the rename
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn ensure_parent(&self) -> Result<(), ConfigError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_error(e)),
            _ => Ok(()),
        }
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

fn default_path() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_default()
        .join(APP_DIR)
        .join(FILE_NAME)
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => self.decode(&content),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(AppConfig::empty()),
            Err(e) => Err(self.read_error(e)),
        }
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let content = self.encode(config)?;
        self.ensure_parent().await?;

        // Stage then rename so a crash never leaves a half-written file
        let staging = self.staging_path();
        fs::write(&staging, content)
            .await
            .map_err(|e| self.write_error(e))?;
        if let Err(e) = fs::rename(&staging, &self.path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(self.write_error(e));
        }

        log::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }

    async fn init(&self) -> Result<(), ConfigError> {
        let content = self.encode(&AppConfig::defaults())?;
        self.ensure_parent().await?;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
            .map_err(|e| match e.kind() {
                IoErrorKind::AlreadyExists => ConfigError::AlreadyExists {
                    path: self.path.clone(),
                },
                _ => self.write_error(e),
            })?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| self.write_error(e))?;
        file.flush().await.map_err(|e| self.write_error(e))
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
