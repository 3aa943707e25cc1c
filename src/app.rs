use std::any::Any;
use std::sync::Arc;

use axum::{
    Json, Router,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::error;

use crate::{downloader::Downloader, routes};

/// Shared request context
#[derive(Clone)]
pub struct Ctx {
    pub downloader: Arc<Downloader>,
    /// Images requested per download call
    pub max_images: usize,
}

impl Ctx {
    pub fn new(downloader: Downloader, max_images: usize) -> Self {
        Self {
            downloader: Arc::new(downloader),
            max_images,
        }
    }
}

/// Error payload returned by every failing route
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Generic 500 that reveals nothing about the cause
pub fn internal_error() -> ApiError {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

/// Build the application router
pub fn router(ctx: Ctx) -> Router {
    routes::mount()
        .with_state(ctx)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    error!("Request handler panicked: {}", detail);

    internal_error().into_response()
}
