use std::future::Future;
use std::time::Duration;

use reqwest::Url;
use serde_json::Value;
use thiserror::Error;

use crate::domain::query::GalleryFilter;

pub const RECENT_PATH: &str = "/api/recent-proxy";
pub const DEFECTS_PATH: &str = "/api/defects";
pub const PRESIGN_PATH: &str = "/api/presign";

/// The three backend calls the client makes. Each resolves to the decoded JSON
/// body of a successful (2xx) response.
pub trait InspectionApi: Send + Sync + 'static {
    fn recent(
        &self,
        query: &[(String, String)],
    ) -> impl Future<Output = Result<Value, ApiError>> + Send;

    fn defects(
        &self,
        filter: &GalleryFilter,
        limit: u32,
        page: u32,
    ) -> impl Future<Output = Result<Value, ApiError>> + Send;

    fn presign(&self, key: &str) -> impl Future<Output = Result<Value, ApiError>> + Send;
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("scripted failure: {0}")]
    Replay(String),
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, pairs: &[(String, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.join(path)?;
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value, ApiError> {
        tracing::debug!(url = %url, "backend request");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(ApiError::from)
    }
}

impl InspectionApi for HttpBackend {
    async fn recent(&self, query: &[(String, String)]) -> Result<Value, ApiError> {
        let url = self.endpoint(RECENT_PATH, query)?;
        self.get_json(url).await
    }

    async fn defects(
        &self,
        filter: &GalleryFilter,
        limit: u32,
        page: u32,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(DEFECTS_PATH, &filter.to_pairs(limit, page))?;
        self.get_json(url).await
    }

    async fn presign(&self, key: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(PRESIGN_PATH, &[("key".to_string(), key.to_string())])?;
        self.get_json(url).await
    }
}
