pub mod analysis;
pub mod config;
pub mod document;
pub mod error;
pub mod feature;
pub mod fetch;
pub mod normalize;
pub mod pipeline;

pub use analysis::{Analysis, ChildRelation, Decision, SubEntity};
pub use config::{AnalyzerConfig, ConfigError, CONTENT_TYPE_KEY};
pub use document::{MetadataValue, ParsedDocument};
pub use error::{Error, Result};
pub use feature::{FeatureBucket, FeatureSet, FeatureValue};
pub use fetch::{DocumentService, Fetcher, HttpDocumentService, ServiceError, ServiceResult};
pub use normalize::Normalizer;
pub use pipeline::{AnalysisStats, AnalyzeError, AnalyzeResult, Analyzer, Report};
