use serde::{Deserialize, Serialize};
use url::Url;

/// Metadata key carrying the declared content type of the file.
pub const CONTENT_TYPE_KEY: &str = "Content-Type";

/// Configuration for one analyzer instance.
///
/// The ignore-list, the noisy-key list, and the truncation thresholds are
/// named rules tuned against the wrapped service's observed quirks; they are
/// supplied here rather than hard-coded so they can be revisited without
/// touching the retry or decision logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Base URL of the unpack service.
    pub service_url: String,
    /// Per-attempt request timeout in seconds.
    pub request_timeout_seconds: u32,
    /// Fixed pause between the first attempt and the single retry.
    pub retry_backoff_ms: u64,
    /// Content types recognized but deliberately not analyzed.
    pub ignore_types: Vec<String>,
    /// Metadata keys stripped before feature emission: parser provenance,
    /// encoding/length bookkeeping, and embedded-stream diagnostics.
    pub drop_keys: Vec<String>,
    /// Longest metadata value (in characters) emitted in full.
    pub max_value_length: usize,
    /// Sample kept from an over-long metadata value.
    pub sample_length: usize,
    /// Longest text payload (in characters) before truncation.
    pub max_text_size: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:9998".to_string(),
            request_timeout_seconds: 160,
            retry_backoff_ms: 1000,
            ignore_types: vec![
                "application/vnd.android.package-archive".to_string(),
                "application/java-archive".to_string(),
                "application/x-archive".to_string(),
            ],
            // The key set changes between service versions and needs to be
            // checked against new releases.
            drop_keys: vec![
                "Content-Length".to_string(),
                "Content-Encoding".to_string(),
                "X-Parsed-By".to_string(),
                "X-TIKA:Parsed-By".to_string(),
                "X-TIKA:Parsed-By-Full-Set".to_string(),
                "resourceName".to_string(),
                "X-TIKA:EXCEPTION:embedded_stream_exception".to_string(),
            ],
            max_value_length: 512,
            sample_length: 100,
            max_text_size: 10 * 1024 * 1024,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.service_url)?;
        if self.max_value_length == 0 {
            return Err(ConfigError::ZeroThreshold("max_value_length"));
        }
        if self.sample_length == 0 {
            return Err(ConfigError::ZeroThreshold("sample_length"));
        }
        if self.max_text_size == 0 {
            return Err(ConfigError::ZeroThreshold("max_text_size"));
        }
        if self.sample_length > self.max_value_length {
            return Err(ConfigError::SampleExceedsMax {
                sample: self.sample_length,
                max: self.max_value_length,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn is_ignored_type(&self, content_type: &str) -> bool {
        self.ignore_types.iter().any(|t| t == content_type)
    }

    #[must_use]
    pub fn is_dropped_key(&self, key: &str) -> bool {
        self.drop_keys.iter().any(|k| k == key)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid service URL: {0}")]
    InvalidServiceUrl(#[from] url::ParseError),
    #[error("{0} must be greater than zero")]
    ZeroThreshold(&'static str),
    #[error("sample_length {sample} exceeds max_value_length {max}")]
    SampleExceedsMax { sample: usize, max: usize },
}
