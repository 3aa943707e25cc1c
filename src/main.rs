mod app;
mod config;
mod crawler;
mod downloader;
mod logging;
mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    app::Ctx, config::AppConfig, crawler::GoogleImageCrawler, downloader::Downloader,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    let _log_guard = logging::init(&config.log)?;

    let crawler = GoogleImageCrawler::new(config.crawler_config())
        .context("Failed to build image crawler")?;
    let downloader = Downloader::new(Arc::new(crawler), config.downloader_config());
    let ctx = Ctx::new(downloader, config.downloader.max_images);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("prodpic listening on http://{}", addr);
    info!("Images are stored in {}", config.storage.output_dir.display());

    axum::serve(listener, app::router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("prodpic stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
