use axum::Router;

use crate::app::Ctx;

pub mod download;
pub mod health;

/// Mount all API routes
pub fn mount() -> Router<Ctx> {
    Router::new()
        .merge(health::mount())
        .merge(download::mount())
}
