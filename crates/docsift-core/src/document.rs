use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A metadata field value: the service returns either a single string or an
/// ordered list of strings for the same key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    One(String),
    Many(Vec<String>),
}

impl MetadataValue {
    /// View the value uniformly as a slice of strings.
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

/// The response of the document-understanding service for one input file.
///
/// Every field is optional. Attachments are base64 strings on the wire and
/// raw bytes here; only the top attachment level is represented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, MetadataValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        serialize_with = "attachments_to_base64",
        deserialize_with = "attachments_from_base64"
    )]
    pub attachments: BTreeMap<String, Vec<u8>>,
}

impl ParsedDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.attachments.insert(name.into(), data);
        self
    }

    /// True when the service reported nothing at all for the file.
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
            && self.content.as_deref().map_or(true, str::is_empty)
            && self.attachments.is_empty()
    }
}

fn attachments_to_base64<S>(
    attachments: &BTreeMap<String, Vec<u8>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(attachments.len()))?;
    for (name, data) in attachments {
        map.serialize_entry(name, &STANDARD.encode(data))?;
    }
    map.end()
}

fn attachments_from_base64<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = BTreeMap::<String, String>::deserialize(deserializer)?;
    encoded
        .into_iter()
        .map(|(name, data)| {
            let bytes = STANDARD.decode(data).map_err(D::Error::custom)?;
            Ok((name, bytes))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_value_as_slice() {
        let one = MetadataValue::from("application/pdf");
        assert_eq!(one.values(), ["application/pdf"]);

        let many = MetadataValue::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(many.values().len(), 2);
    }

    #[test]
    fn test_deserialize_mixed_metadata() {
        let doc: ParsedDocument = serde_json::from_str(
            r#"{
                "metadata": {
                    "Content-Type": "application/pdf",
                    "pdf:charsPerPage": ["2142", "37"]
                },
                "content": "hello"
            }"#,
        )
        .unwrap();

        assert_eq!(
            doc.metadata["Content-Type"],
            MetadataValue::One("application/pdf".into())
        );
        assert_eq!(doc.metadata["pdf:charsPerPage"].values().len(), 2);
        assert_eq!(doc.content.as_deref(), Some("hello"));
        assert!(doc.attachments.is_empty());
    }

    #[test]
    fn test_attachments_decode_from_base64() {
        let doc: ParsedDocument = serde_json::from_str(
            r#"{"attachments": {"inner.bin": "aGVsbG8="}}"#,
        )
        .unwrap();

        assert_eq!(doc.attachments["inner.bin"], b"hello");
    }

    #[test]
    fn test_attachments_reject_bad_base64() {
        let result: Result<ParsedDocument, _> =
            serde_json::from_str(r#"{"attachments": {"inner.bin": "not base64!!"}}"#);

        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip() {
        let doc = ParsedDocument::new()
            .with_metadata("Custom", "bar")
            .with_content("text")
            .with_attachment("child.txt", b"payload".to_vec());

        let json = serde_json::to_string(&doc).unwrap();
        let parsed: ParsedDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_is_empty() {
        assert!(ParsedDocument::new().is_empty());
        assert!(ParsedDocument::new().with_content("").is_empty());
        assert!(!ParsedDocument::new().with_content("x").is_empty());
        assert!(!ParsedDocument::new().with_metadata("k", "v").is_empty());
        assert!(!ParsedDocument::new()
            .with_attachment("a", vec![0])
            .is_empty());
    }
}
