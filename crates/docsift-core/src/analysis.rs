use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feature::{FeatureBucket, FeatureSet, FeatureValue};

/// Whether analysis results are produced for an input at all.
///
/// Abstention is a normal outcome, not an error: the file was recognized but
/// deliberately skipped, or the service had nothing to say about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Proceed,
    Abstain,
}

impl Decision {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proceed => "proceed",
            Self::Abstain => "abstain",
        }
    }

    #[must_use]
    pub fn is_abstain(&self) -> bool {
        matches!(self, Self::Abstain)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Decision {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proceed" => Ok(Self::Proceed),
            "abstain" => Ok(Self::Abstain),
            _ => Err(crate::Error::InvalidDecision(s.to_string())),
        }
    }
}

/// How a derived sub-entity relates to the file it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildRelation {
    Extracted,
}

impl ChildRelation {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extracted => "extracted",
        }
    }
}

impl std::fmt::Display for ChildRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attachment discovered inside the analyzed file: raw bytes plus an
/// optional `filename` feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubEntity {
    pub id: Uuid,
    pub name: String,
    #[serde(skip)]
    pub data: Vec<u8>,
    pub relation: ChildRelation,
    pub features: FeatureSet,
}

impl SubEntity {
    #[must_use]
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            data,
            relation: ChildRelation::Extracted,
            features: FeatureSet::new(),
        }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.features
            .push(FeatureBucket::Filename, FeatureValue::new(filename));
        self
    }

    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.features
            .get(FeatureBucket::Filename)
            .first()
            .map(|f| f.value.as_str())
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Normalized output for one input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub decision: Decision,
    pub features: FeatureSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SubEntity>,
}

impl Analysis {
    /// An analysis that will be filled in; empty outputs under `Proceed` are
    /// a valid result, distinct from abstention.
    #[must_use]
    pub fn proceed() -> Self {
        Self {
            decision: Decision::Proceed,
            features: FeatureSet::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Explicit decision not to produce results for this input.
    #[must_use]
    pub fn abstain() -> Self {
        Self {
            decision: Decision::Abstain,
            ..Self::proceed()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.text.is_none() && self.children.is_empty()
    }
}
