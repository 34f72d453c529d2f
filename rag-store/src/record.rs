//! Core data models: persisted artifacts, indexable items and retrieval hits.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload field names shared by index building and retrieval.
pub mod fields {
    pub const TEXT: &str = "text";
    pub const ORDINAL: &str = "ordinal";

    pub const FAQ_ID: &str = "faq_id";
    pub const ANSWER: &str = "answer";
    pub const KIND: &str = "kind";

    pub const DOC_ID: &str = "doc_id";
    pub const URL: &str = "url";
    pub const TITLE: &str = "title";
    pub const SECTION: &str = "section";
    pub const SUMMARY: &str = "summary";
}

/// Curated question with its verified answer and paraphrases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub variations: Vec<String>,
}

/// Whether an FAQ index item is the canonical question or a paraphrase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaqItemKind {
    MainQuestion,
    Variation,
}

impl FaqItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FaqItemKind::MainQuestion => "main_question",
            FaqItemKind::Variation => "variation",
        }
    }
}

/// Source-page metadata attached to a document chunk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
}

/// Augmented document chunk; `augmented_content` is what gets embedded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    #[serde(rename = "content", default)]
    pub original_content: String,
    pub augmented_content: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    /// Source URL, if present and non-blank.
    pub fn url(&self) -> Option<&str> {
        non_blank(self.metadata.url.as_deref())
    }
}

/// One embeddable unit ready for upsert.
///
/// `key` feeds the deterministic point id; `payload` becomes Qdrant metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexItem {
    pub key: String,
    pub text: String,
    pub payload: Map<String, Value>,
}

/// A single scored match returned by a similarity index.
///
/// `score` is required: an index that cannot produce scores cannot be used.
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievalHit {
    pub item_id: String,
    pub score: f32,
    pub metadata: Map<String, Value>,
}

impl RetrievalHit {
    /// String metadata field, `None` when missing or blank.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        non_blank(self.metadata.get(key).and_then(Value::as_str))
    }

    /// Insertion position recorded at index time.
    pub fn ordinal(&self) -> Option<u64> {
        self.metadata.get(fields::ORDINAL).and_then(Value::as_u64)
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_chunk_reads_artifact_shape() {
        let raw = json!({
            "id": "doc_7",
            "content": "Fees are due in July.",
            "augmented_content": "Tuition fees: due in July each year.",
            "summary": "fee deadline",
            "metadata": {"url": "https://college.example/fees", "title": "Fees"}
        });
        let chunk: DocumentChunk = serde_json::from_value(raw).unwrap();
        assert_eq!(chunk.original_content, "Fees are due in July.");
        assert_eq!(chunk.url(), Some("https://college.example/fees"));
        assert_eq!(chunk.metadata.section, None);
    }

    #[test]
    fn blank_url_is_treated_as_missing() {
        let raw = json!({"id": "d", "augmented_content": "x", "metadata": {"url": "  "}});
        let chunk: DocumentChunk = serde_json::from_value(raw).unwrap();
        assert_eq!(chunk.url(), None);
    }

    #[test]
    fn faq_variations_default_to_empty() {
        let raw = json!({"id": "faq_001", "question": "Q?", "answer": "A."});
        let faq: FaqEntry = serde_json::from_value(raw).unwrap();
        assert!(faq.variations.is_empty());
    }

    #[test]
    fn hit_metadata_accessors() {
        let mut metadata = Map::new();
        metadata.insert(fields::ORDINAL.into(), json!(3));
        metadata.insert(fields::URL.into(), json!(""));
        let hit = RetrievalHit {
            item_id: "p".into(),
            score: 0.5,
            metadata,
        };
        assert_eq!(hit.ordinal(), Some(3));
        assert_eq!(hit.meta_str(fields::URL), None);
    }
}
