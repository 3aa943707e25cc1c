use axum::Router;

use crate::app::Ctx;

mod api;

/// Mount all routes
pub fn mount() -> Router<Ctx> {
    Router::new().merge(api::mount())
}
