use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The four output buckets a feature value can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureBucket {
    /// Ordinary metadata field, emitted in full.
    FileMetadata,
    /// Metadata field that was too long; only a sample was kept.
    DroppedMetadata,
    /// Declared content type(s) of the file.
    Mime,
    /// Name of an attachment discovered inside the file.
    Filename,
}

impl FeatureBucket {
    pub const ALL: [Self; 4] = [
        Self::FileMetadata,
        Self::DroppedMetadata,
        Self::Mime,
        Self::Filename,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileMetadata => "file_metadata",
            Self::DroppedMetadata => "dropped_metadata",
            Self::Mime => "mime",
            Self::Filename => "filename",
        }
    }
}

impl std::fmt::Display for FeatureBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureBucket {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file_metadata" => Ok(Self::FileMetadata),
            "dropped_metadata" => Ok(Self::DroppedMetadata),
            "mime" => Ok(Self::Mime),
            "filename" => Ok(Self::Filename),
            _ => Err(crate::Error::InvalidFeatureBucket(s.to_string())),
        }
    }
}

/// One labeled scalar datum attached to an analyzed entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureValue {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FeatureValue {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }

    #[must_use]
    pub fn labeled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: Some(label.into()),
        }
    }
}

/// Feature values grouped by bucket, in emission order within each bucket.
///
/// Owned by a single analysis invocation; there is no cross-call state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet {
    buckets: BTreeMap<FeatureBucket, Vec<FeatureValue>>,
}

impl FeatureSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bucket: FeatureBucket, value: FeatureValue) {
        self.buckets.entry(bucket).or_default().push(value);
    }

    #[must_use]
    pub fn get(&self, bucket: FeatureBucket) -> &[FeatureValue] {
        self.buckets.get(&bucket).map_or(&[], Vec::as_slice)
    }

    /// Total number of values across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureBucket, &FeatureValue)> {
        self.buckets
            .iter()
            .flat_map(|(bucket, values)| values.iter().map(|v| (*bucket, v)))
    }
}
