//! Domain error types

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Machine-readable error kinds surfaced to callers of the core.
///
/// The transfer endpoint maps these to HTTP status codes; the core itself
/// never produces user-facing prose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    PayloadTooSmall,
    InvalidPayload,
    DecodeError,
    UnsupportedPlatform,
    ExternalToolMissing,
    ClipboardTimeout,
    ClipboardBusy,
    ClipboardCommitFailed,
}

impl ErrorKind {
    /// Get the wire name of the kind
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PayloadTooSmall => "payload_too_small",
            Self::InvalidPayload => "invalid_payload",
            Self::DecodeError => "decode_error",
            Self::UnsupportedPlatform => "unsupported_platform",
            Self::ExternalToolMissing => "external_tool_missing",
            Self::ClipboardTimeout => "clipboard_timeout",
            Self::ClipboardBusy => "clipboard_busy",
            Self::ClipboardCommitFailed => "clipboard_commit_failed",
        }
    }

    /// Whether the failure was caused by the request content
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::PayloadTooSmall | Self::InvalidPayload | Self::DecodeError
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error(
    "Invalid duration \"{input}\": expected minutes, seconds and milliseconds \
     in that order (e.g. 10s, 1m30s, 500ms)"
)]
pub struct DurationParseError {
    pub input: String,
}

/// Errors raised while building an image payload from request data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("Image data too small: {len} bytes (minimum {min})")]
    TooSmall { len: usize, min: usize },

    #[error("Invalid base64 image data: {0}")]
    InvalidBase64(String),

    #[error("Empty image data")]
    Empty,
}

impl PayloadError {
    /// Machine-readable kind
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TooSmall { .. } => ErrorKind::PayloadTooSmall,
            Self::InvalidBase64(_) | Self::Empty => ErrorKind::InvalidPayload,
        }
    }
}

/// Error when bytes cannot be turned into a clipboard image
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    #[error("Unrecognized image format")]
    UnknownFormat,

    #[error("Failed to decode image: {0}")]
    Corrupt(String),

    #[error("Failed to encode {format} image: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },
}

impl DecodeError {
    /// Machine-readable kind
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::DecodeError
    }
}

/// Error when no clipboard strategy chain exists for the running OS
#[derive(Debug, Clone, Error)]
#[error("Clipboard images are not supported on {os}")]
pub struct UnsupportedPlatformError {
    pub os: &'static str,
}

impl UnsupportedPlatformError {
    /// Error for the OS this binary was built for
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS,
        }
    }

    /// Machine-readable kind
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::UnsupportedPlatform
    }
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {}", .path.display())]
    AlreadyExists { path: PathBuf },
}
