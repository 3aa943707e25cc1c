use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::app::{ApiError, Ctx, error_response, internal_error};

/// Slot used for the request-scoped scratch directory
const DOWNLOAD_SLOT: usize = 0;

/// Download request
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    /// Product to search an image for
    #[serde(default)]
    pub product_name: String,
}

/// Download response
#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub message: String,
    pub image_filename: String,
}

/// Download one image for a product
/// POST /download_image
async fn download_image(
    State(ctx): State<Ctx>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Json<DownloadResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| {
        error!("Error in download_image endpoint: {}", e);
        internal_error()
    })?;

    let product_name = req.product_name.trim();
    if product_name.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Product name is required",
        ));
    }

    let output_dir = &ctx.downloader.config().output_dir;
    tokio::fs::create_dir_all(output_dir).await.map_err(|e| {
        error!(
            "Error in download_image endpoint: cannot create {}: {}",
            output_dir.display(),
            e
        );
        internal_error()
    })?;

    let image_filename = ctx
        .downloader
        .download(product_name, DOWNLOAD_SLOT, ctx.max_images)
        .await
        .map_err(|_| {
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to download image for {product_name}"),
            )
        })?;

    Ok(Json(DownloadResponse {
        message: format!("Image downloaded successfully for {product_name}"),
        image_filename,
    }))
}

/// Mount download routes
pub fn mount() -> Router<Ctx> {
    Router::new().route("/download_image", post(download_image))
}
