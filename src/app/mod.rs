mod config;
mod error;
mod logging;
mod runtime;

pub use config::{AppConfig, BackendSource};
pub use error::AppError;
pub use runtime::RunMode;

use crate::adapters::page::PageKind;

/// Full page: live feed plus defect gallery, polling until interrupted.
pub fn run() -> Result<(), AppError> {
    start(None, RunMode::Continuous)
}

pub fn run_live() -> Result<(), AppError> {
    start(Some(PageKind::Live), RunMode::Continuous)
}

pub fn run_gallery() -> Result<(), AppError> {
    start(Some(PageKind::Gallery), RunMode::Once)
}

fn start(page_kind: Option<PageKind>, mode: RunMode) -> Result<(), AppError> {
    logging::init()?;

    let mut config = AppConfig::from_env()?;
    if let Some(page_kind) = page_kind {
        config.page_kind = page_kind;
    }

    let backend = match &config.backend {
        BackendSource::Http { base_url } => base_url.clone(),
        BackendSource::Replay { path } => format!("replay:{path}"),
    };

    tracing::info!(
        backend = %backend,
        page = ?config.page_kind,
        page_query = %config.page_query,
        poll_interval_ms = config.poll_interval_ms,
        http_timeout_ms = ?config.http_timeout_ms,
        snapshot_path = ?config.snapshot_path,
        mode = ?mode,
        "application bootstrap initialized"
    );

    runtime::run(config, mode)
}
