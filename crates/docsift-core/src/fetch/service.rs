use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::config::AnalyzerConfig;
use crate::document::ParsedDocument;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
    #[error("Service returned status {0}")]
    Status(StatusCode),
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    /// A hard timeout means the service itself is stuck; the fetcher must
    /// not retry it.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Black-box view of the document-understanding service: one synchronous
/// request per file, returning the parsed document or `None` when the
/// service produced no result.
#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn unpack(&self, path: &Path) -> ServiceResult<Option<ParsedDocument>>;
}

/// HTTP implementation: PUT the file bytes to the service's unpack route
/// and decode the JSON response.
pub struct HttpDocumentService {
    client: Client,
    unpack_url: Url,
    request_timeout: Duration,
}

impl HttpDocumentService {
    pub fn new(config: &AnalyzerConfig) -> ServiceResult<Self> {
        let base = Url::parse(&config.service_url)?;
        let unpack_url = base.join("unpack/all")?;
        let request_timeout = Duration::from_secs(u64::from(config.request_timeout_seconds));

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(ServiceError::Http)?;

        Ok(Self {
            client,
            unpack_url,
            request_timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> ServiceError {
        if err.is_timeout() {
            ServiceError::Timeout(self.request_timeout)
        } else {
            ServiceError::Http(err)
        }
    }
}

#[async_trait]
impl DocumentService for HttpDocumentService {
    async fn unpack(&self, path: &Path) -> ServiceResult<Option<ParsedDocument>> {
        let data = tokio::fs::read(path).await?;

        let response = self
            .client
            .put(self.unpack_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .body(data)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        if body.trim().is_empty() || body.trim() == "null" {
            return Ok(None);
        }

        let document: ParsedDocument = serde_json::from_str(&body)?;
        Ok(Some(document))
    }
}
