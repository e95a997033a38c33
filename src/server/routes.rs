//! HTTP routes for the transfer endpoint

use std::convert::Infallible;
use std::sync::Arc;

use serde::Serialize;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::multipart::FormData;
use warp::reply::{Json, WithStatus};
use warp::{Filter, Rejection, Reply};

use crate::application::ports::Notifier;
use crate::application::PasteImageUseCase;
use crate::domain::error::ErrorKind;
use crate::domain::image::ImagePayload;

use super::response::{ApiResponse, PingResponse};
use super::upload::{payload_from_body, payload_from_form, UploadError};

/// Paste use case shared by every request
pub type SharedPaste = Arc<PasteImageUseCase<Box<dyn Notifier>>>;

const INDEX_HTML: &str = include_str!("assets/index.html");

/// All routes, with rejections turned into JSON bodies
pub fn routes(
    paste: SharedPaste,
    max_upload: u64,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    index()
        .or(ping())
        .or(upload(paste, max_upload))
        .recover(handle_rejection)
        .with(warp::log("snappaste::http"))
}

fn index() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::html(INDEX_HTML))
}

fn ping() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "ping")
        .and(warp::get())
        .map(|| warp::reply::json(&PingResponse::default()))
}

/// `POST /api/upload`: multipart first, any other body second
fn upload(
    paste: SharedPaste,
    max_upload: u64,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let post = warp::path!("api" / "upload").and(warp::post());

    let multipart = post
        .clone()
        .and(warp::multipart::form().max_length(max_upload))
        .and(with_paste(Arc::clone(&paste)))
        .and_then(handle_multipart);

    let body = post
        .and(warp::body::content_length_limit(max_upload))
        .and(warp::header::optional::<String>("content-type"))
        .and(warp::body::bytes())
        .and(with_paste(paste))
        .and_then(handle_body);

    multipart.or(body)
}

fn with_paste(
    paste: SharedPaste,
) -> impl Filter<Extract = (SharedPaste,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&paste))
}

async fn handle_multipart(
    form: FormData,
    paste: SharedPaste,
) -> Result<WithStatus<Json>, Infallible> {
    let response = match payload_from_form(form).await {
        Ok(payload) => paste_payload(&paste, payload).await,
        Err(e) => reject_upload(e),
    };
    Ok(response.into_reply())
}

async fn handle_body(
    content_type: Option<String>,
    body: Bytes,
    paste: SharedPaste,
) -> Result<WithStatus<Json>, Infallible> {
    let response = match payload_from_body(content_type.as_deref(), body) {
        Ok(payload) => paste_payload(&paste, payload).await,
        Err(e) => reject_upload(e),
    };
    Ok(response.into_reply())
}

async fn paste_payload(paste: &SharedPaste, payload: ImagePayload) -> ApiResponse {
    match paste.execute(payload).await {
        Ok(output) => {
            log::info!(
                "Pasted {}x{} image ({}) via {}",
                output.width,
                output.height,
                output.human_size,
                output.receipt.strategy
            );
            for attempt in &output.receipt.failed_attempts {
                log::debug!("  {} failed first: {}", attempt.strategy, attempt.error);
            }
            ApiResponse::success(output.size)
        }
        Err(e) => {
            log::error!("Paste failed ({}): {}", e.root_kind(), e);
            ApiResponse::failure(e.to_string(), e.kind())
        }
    }
}

fn reject_upload(error: UploadError) -> ApiResponse {
    log::warn!("Rejected upload: {}", error);
    ApiResponse::failure(error.to_string(), error.kind())
}

#[derive(Serialize)]
struct RejectionBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
}

async fn handle_rejection(err: Rejection) -> Result<WithStatus<Json>, Infallible> {
    let (status, error, kind) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string(), None)
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "Image exceeds the upload size limit".to_string(),
            Some(ErrorKind::InvalidPayload),
        )
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (
            StatusCode::LENGTH_REQUIRED,
            "Content-Length header required".to_string(),
            Some(ErrorKind::InvalidPayload),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
            None,
        )
    } else {
        log::debug!("Unhandled rejection: {:?}", err);
        (
            StatusCode::BAD_REQUEST,
            "Invalid request".to_string(),
            Some(ErrorKind::InvalidPayload),
        )
    };

    let body = RejectionBody {
        success: false,
        error,
        kind,
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
