use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::analysis::Analysis;
use crate::config::{AnalyzerConfig, ConfigError};
use crate::fetch::{DocumentService, Fetcher, HttpDocumentService, ServiceError};
use crate::normalize::Normalizer;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub feature_count: usize,
    pub child_count: usize,
    pub text_bytes: usize,
    pub duration_ms: u64,
}

/// Serializable record of one analyzed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub source: String,
    pub analyzed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub analysis: Analysis,
    pub stats: AnalysisStats,
}

/// Ties the fetcher and the normalizer together for single-file analysis.
///
/// Each call is self-contained: one request in flight, fresh outputs, no
/// state shared between invocations.
pub struct Analyzer {
    fetcher: Fetcher,
    normalizer: Normalizer,
}

impl Analyzer {
    /// Build an analyzer talking to the HTTP unpack service from `config`.
    pub fn new(config: AnalyzerConfig) -> AnalyzeResult<Self> {
        config.validate()?;
        let service = HttpDocumentService::new(&config)?;
        Ok(Self::with_service(Box::new(service), config))
    }

    /// Build an analyzer over an arbitrary service implementation.
    #[must_use]
    pub fn with_service(service: Box<dyn DocumentService>, config: AnalyzerConfig) -> Self {
        let backoff = Duration::from_millis(config.retry_backoff_ms);
        Self {
            fetcher: Fetcher::new(service).with_backoff(backoff),
            normalizer: Normalizer::new(config),
        }
    }

    /// Analyze one file: fetch with the bounded retry, then normalize.
    ///
    /// A service response that is still empty after the retry budget maps to
    /// an abstaining report, not an error.
    pub async fn analyze_file(&self, path: &Path) -> AnalyzeResult<Report> {
        let start = Instant::now();

        let analysis = match self.fetcher.fetch(path).await? {
            Some(document) => {
                let source_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
                self.normalizer.normalize(&document, source_name)
            }
            None => Analysis::abstain(),
        };

        let stats = AnalysisStats {
            feature_count: analysis.features.len(),
            child_count: analysis.children.len(),
            text_bytes: analysis.text.as_deref().map_or(0, str::len),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            source = %path.display(),
            decision = %analysis.decision,
            features = stats.feature_count,
            children = stats.child_count,
            "analysis complete"
        );

        Ok(Report {
            source: path.display().to_string(),
            analyzed_at: Utc::now(),
            analysis,
            stats,
        })
    }
}
