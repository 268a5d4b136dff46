use std::sync::Arc;
use std::time::Duration;

use crate::adapters::backend::{HttpBackend, InspectionApi};
use crate::adapters::page::MemoryPage;
use crate::adapters::replay::ReplayBackend;
use crate::app::config::{AppConfig, BackendSource};
use crate::app::error::AppError;
use crate::ui::boot::boot;
use crate::ui::gallery::GalleryLoad;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Keep the live feed polling until interrupted.
    Continuous,
    /// Render once and exit.
    Once,
}

pub fn run(config: AppConfig, mode: RunMode) -> Result<(), AppError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AppError::runtime)?;

    runtime.block_on(async move {
        match &config.backend {
            BackendSource::Http { base_url } => {
                let timeout = config.http_timeout_ms.map(Duration::from_millis);
                let backend = HttpBackend::new(base_url, timeout).map_err(AppError::backend)?;
                serve(&config, mode, Arc::new(backend)).await
            }
            BackendSource::Replay { path } => {
                let backend = ReplayBackend::from_file(path).map_err(AppError::backend)?;
                serve(&config, mode, Arc::new(backend)).await
            }
        }
    })
}

pub fn build_page(config: &AppConfig) -> MemoryPage {
    let page = MemoryPage::for_kind(config.page_kind, &config.page_query);
    match &config.snapshot_path {
        Some(path) => page.with_snapshot(path),
        None => page,
    }
}

async fn serve<A>(config: &AppConfig, mode: RunMode, api: Arc<A>) -> Result<(), AppError>
where
    A: InspectionApi,
{
    let page = Arc::new(build_page(config));
    let mut report = boot(
        Arc::clone(&page),
        api,
        Duration::from_millis(config.poll_interval_ms),
    )
    .await;

    if let Some(GalleryLoad::Failed(message)) = &report.gallery {
        tracing::warn!(error = %message, "defect gallery unavailable");
    }

    if mode == RunMode::Continuous && report.live.is_active() {
        tokio::signal::ctrl_c().await.map_err(AppError::runtime)?;
        tracing::info!("shutdown requested");
    }

    report.poller.stop();

    if config.snapshot_path.is_none() {
        println!("{}", page.render_document());
    }

    Ok(())
}
