use std::path::Path;
use std::time::Duration;

use tracing::{error, warn};

use super::service::{DocumentService, ServiceResult};
use crate::document::ParsedDocument;

/// Bounded-retry wrapper around the unpack service.
///
/// The service is known to be flaky under concurrent load, so a transient
/// first-attempt failure is retried exactly once after a fixed backoff. Hard
/// timeouts are never retried: a stuck service will not recover on a fresh
/// connection within one request budget.
pub struct Fetcher {
    service: Box<dyn DocumentService>,
    backoff: Duration,
}

impl Fetcher {
    #[must_use]
    pub fn new(service: Box<dyn DocumentService>) -> Self {
        Self {
            service,
            backoff: Duration::from_secs(1),
        }
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Fetch the parsed document for `path` with a budget of two attempts.
    ///
    /// An empty first result consumes the retry the same way a transient
    /// error does; whatever the second attempt produces is final, including
    /// its error.
    pub async fn fetch(&self, path: &Path) -> ServiceResult<Option<ParsedDocument>> {
        match self.service.unpack(path).await {
            Ok(Some(document)) if !document.is_empty() => return Ok(Some(document)),
            Ok(_) => {
                warn!(path = %path.display(), "unpack returned no result, retrying");
            }
            Err(err) if err.is_timeout() => return Err(err),
            Err(err) => {
                error!(path = %path.display(), error = %err, "unpack failed, retrying");
            }
        }

        tokio::time::sleep(self.backoff).await;

        match self.service.unpack(path).await? {
            Some(document) if !document.is_empty() => Ok(Some(document)),
            _ => Ok(None),
        }
    }
}
