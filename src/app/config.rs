use crate::adapters::page::PageKind;
use crate::app::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSource {
    Http { base_url: String },
    Replay { path: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendSource,
    pub page_kind: PageKind,
    pub page_query: String,
    pub poll_interval_ms: u64,
    pub http_timeout_ms: Option<u64>,
    pub snapshot_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        if let Err(error) = dotenvy::dotenv()
            && !error.not_found()
        {
            return Err(AppError::config(format!("failed to load .env: {error}")));
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match non_empty(&lookup, "AOI_UI_REPLAY_FILE") {
            Some(path) => BackendSource::Replay { path },
            None => BackendSource::Http {
                base_url: non_empty(&lookup, "AOI_UI_BASE_URL").ok_or_else(|| {
                    AppError::config("AOI_UI_BASE_URL is required unless AOI_UI_REPLAY_FILE is set")
                })?,
            },
        };

        let page_kind = match non_empty(&lookup, "AOI_UI_PAGE") {
            Some(raw) => PageKind::parse(&raw).ok_or_else(|| {
                AppError::config("AOI_UI_PAGE must be one of: live, gallery, all")
            })?,
            None => PageKind::All,
        };

        let poll_interval_ms = parse_or_default(&lookup, "POLL_INTERVAL_MS", 5000_u64)?;
        if poll_interval_ms == 0 {
            return Err(AppError::config("POLL_INTERVAL_MS must be greater than zero"));
        }

        Ok(Self {
            backend,
            page_kind,
            page_query: non_empty(&lookup, "AOI_UI_PAGE_QUERY")
                .map(|query| query.trim_start_matches('?').to_string())
                .unwrap_or_default(),
            poll_interval_ms,
            http_timeout_ms: parse_optional(&lookup, "HTTP_TIMEOUT_MS")?,
            snapshot_path: non_empty(&lookup, "SNAPSHOT_PATH"),
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_optional<T, F>(lookup: &F, key: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::config(format!("{key} must be a valid number"))),
        None => Ok(None),
    }
}

fn parse_or_default<T, F>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_optional(lookup, key)?.unwrap_or(default))
}
