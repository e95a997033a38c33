//! JSON response bodies and status mapping

use serde::Serialize;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};

use crate::domain::error::ErrorKind;

/// Message returned with every successful upload
pub const SUCCESS_MESSAGE: &str = "Image copied to clipboard";

/// Upload response body
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Success {
        success: bool,
        message: &'static str,
        size: usize,
    },
    Failure {
        success: bool,
        error: String,
        kind: ErrorKind,
    },
}

impl ApiResponse {
    pub fn success(size: usize) -> Self {
        Self::Success {
            success: true,
            message: SUCCESS_MESSAGE,
            size,
        }
    }

    pub fn failure(error: impl Into<String>, kind: ErrorKind) -> Self {
        Self::Failure {
            success: false,
            error: error.into(),
            kind,
        }
    }

    /// HTTP status for this body
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Success { .. } => StatusCode::OK,
            Self::Failure { kind, .. } => status_for(*kind),
        }
    }

    pub fn into_reply(self) -> WithStatus<Json> {
        let status = self.status();
        warp::reply::with_status(warp::reply::json(&self), status)
    }
}

/// Health check body
#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for PingResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            service: "SnapPaste",
        }
    }
}

/// Map an error kind onto an HTTP status
pub fn status_for(kind: ErrorKind) -> StatusCode {
    if kind.is_client_error() {
        StatusCode::BAD_REQUEST
    } else if kind == ErrorKind::ClipboardBusy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
