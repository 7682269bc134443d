use tracing::debug;

use crate::analysis::{Analysis, SubEntity};
use crate::config::{AnalyzerConfig, CONTENT_TYPE_KEY};
use crate::document::ParsedDocument;
use crate::feature::{FeatureBucket, FeatureValue};

/// Marker appended to text payloads cut at `max_text_size`.
const TRUNCATION_MARKER: &str = "\n(truncated)";

/// Re-shapes one service response into features, an optional text payload,
/// and derived sub-entities, or abstains.
///
/// Pure and infallible: no I/O, absent fields are treated as empty, and the
/// only abstentions are an ignored content type or an empty document.
pub struct Normalizer {
    config: AnalyzerConfig,
}

impl Normalizer {
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Normalize `parsed` for the file originally named `source_name`.
    ///
    /// `source_name` is the input file's base name, used only for the
    /// attachment filename heuristic.
    #[must_use]
    pub fn normalize(&self, parsed: &ParsedDocument, source_name: &str) -> Analysis {
        if parsed.is_empty() {
            return Analysis::abstain();
        }

        let mut analysis = Analysis::proceed();

        if let Some(content_type) = parsed.metadata.get(CONTENT_TYPE_KEY) {
            if content_type
                .values()
                .iter()
                .any(|v| self.config.is_ignored_type(v))
            {
                debug!(source = source_name, "content type is ignored, abstaining");
                return Analysis::abstain();
            }
            for value in content_type.values() {
                analysis
                    .features
                    .push(FeatureBucket::Mime, FeatureValue::new(value.clone()));
            }
        }

        for (key, value) in &parsed.metadata {
            if key == CONTENT_TYPE_KEY || self.config.is_dropped_key(key) {
                continue;
            }
            for value in value.values() {
                if value.is_empty() {
                    continue;
                }
                let length = value.chars().count();
                if length > self.config.max_value_length {
                    let sample: String = value.chars().take(self.config.sample_length).collect();
                    debug!(key, length, "metadata value over limit, keeping a sample");
                    analysis.features.push(
                        FeatureBucket::DroppedMetadata,
                        FeatureValue::labeled(sample, key.clone()),
                    );
                } else {
                    analysis.features.push(
                        FeatureBucket::FileMetadata,
                        FeatureValue::labeled(value.clone(), key.clone()),
                    );
                }
            }
        }

        if let Some(content) = parsed.content.as_deref() {
            let content = content.trim();
            if !content.is_empty() {
                analysis.text = Some(self.truncate_text(content));
            }
        }

        for (name, data) in &parsed.attachments {
            let mut child = SubEntity::new(name.clone(), data.clone());
            // The service sometimes reuses the original (often randomly
            // generated) filename for attachments; recording it again is
            // redundant.
            if !name.contains(source_name) {
                child = child.with_filename(name.clone());
            }
            analysis.children.push(child);
        }

        analysis
    }

    fn truncate_text(&self, content: &str) -> String {
        if content.chars().count() <= self.config.max_text_size {
            return content.to_string();
        }
        let mut text: String = content.chars().take(self.config.max_text_size).collect();
        text.push_str(TRUNCATION_MARKER);
        text
    }
}
