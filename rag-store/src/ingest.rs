//! Index building: artifacts → indexable items → embeddings → Qdrant upsert.
//!
//! FAQ entries expand to one item per question and per variation; document
//! chunks map to one item each, embedding `augmented_content`. Every item
//! carries an `ordinal` payload field (insertion position) used to break
//! score ties at query time.

use std::collections::HashMap;

use indicatif::{ProgressBar, ProgressStyle};
use qdrant_client::qdrant::{ListValue, PointStruct, Struct, Value as QValue, value};
use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument, warn};

use crate::config::{RagConfig, VectorSpace};
use crate::embed::EmbeddingsProvider;
use crate::embed_pool::embed_all;
use crate::errors::RagError;
use crate::ids::stable_uuid;
use crate::qdrant_facade::QdrantFacade;
use crate::record::{DocumentChunk, FaqEntry, FaqItemKind, IndexItem, fields};

/// Expands FAQ entries into indexable items, keeping file order.
///
/// Item keys are `"{faq_id}#{n}"` with `n = 0` for the main question and
/// `1..` for variations, so point ids stay stable across rebuilds.
pub fn faq_items(entries: &[FaqEntry]) -> Vec<IndexItem> {
    let mut items = Vec::with_capacity(entries.len() * 4);

    for entry in entries {
        let texts = std::iter::once((FaqItemKind::MainQuestion, entry.question.as_str())).chain(
            entry
                .variations
                .iter()
                .map(|v| (FaqItemKind::Variation, v.as_str())),
        );

        for (n, (kind, text)) in texts.enumerate() {
            let text = text.trim();
            if text.is_empty() {
                debug!(faq_id = %entry.id, n, "skipping blank variation");
                continue;
            }

            let mut payload = Map::new();
            payload.insert(fields::FAQ_ID.into(), json!(entry.id));
            payload.insert(fields::TEXT.into(), json!(text));
            payload.insert(fields::ANSWER.into(), json!(entry.answer));
            payload.insert(fields::KIND.into(), json!(kind.as_str()));
            payload.insert(fields::ORDINAL.into(), json!(items.len() as u64));

            items.push(IndexItem {
                key: format!("{}#{n}", entry.id),
                text: text.to_string(),
                payload,
            });
        }
    }

    items
}

/// Maps document chunks into indexable items, one per chunk.
pub fn document_items(chunks: &[DocumentChunk]) -> Vec<IndexItem> {
    chunks
        .iter()
        .enumerate()
        .map(|(ordinal, chunk)| {
            let mut payload = Map::new();
            payload.insert(fields::DOC_ID.into(), json!(chunk.id));
            payload.insert(fields::TEXT.into(), json!(chunk.augmented_content));
            if let Some(url) = chunk.url() {
                payload.insert(fields::URL.into(), json!(url));
            }
            if let Some(title) = &chunk.metadata.title {
                payload.insert(fields::TITLE.into(), json!(title));
            }
            if let Some(section) = &chunk.metadata.section {
                payload.insert(fields::SECTION.into(), json!(section));
            }
            if !chunk.summary.trim().is_empty() {
                payload.insert(fields::SUMMARY.into(), json!(chunk.summary));
            }
            payload.insert(fields::ORDINAL.into(), json!(ordinal as u64));

            IndexItem {
                key: chunk.id.clone(),
                text: chunk.augmented_content.clone(),
                payload,
            }
        })
        .collect()
}

/// Embeds `items` and upserts them into the facade's collection.
///
/// With `recreate`, the collection is dropped and created again first;
/// otherwise it is created only when missing.
///
/// Returns the number of points written.
///
/// # Errors
/// Embedding failures, dimension mismatches and Qdrant errors are propagated.
#[instrument(skip_all, fields(collection = facade.collection(), items = items.len(), recreate = recreate))]
pub async fn ingest_items(
    facade: &QdrantFacade,
    cfg: &RagConfig,
    items: &[IndexItem],
    provider: &dyn EmbeddingsProvider,
    recreate: bool,
) -> Result<u64, RagError> {
    if items.is_empty() {
        warn!("nothing to index");
        return Ok(0);
    }

    let texts: Vec<String> = items.iter().map(|i| i.text.clone()).collect();

    let pb = progress_bar(items.len() as u64, "embedding");
    let vectors = embed_all(
        &texts,
        provider,
        cfg.embedding_dim,
        cfg.embedding_concurrency,
        Some(&pb),
    )
    .await;
    pb.finish_and_clear();
    let vectors = vectors?;

    let size = vectors.first().map(Vec::len).unwrap_or(0);
    let space = VectorSpace {
        size,
        distance: facade.distance(),
    };
    if recreate {
        facade.recreate_collection(&space).await?;
    } else {
        facade.ensure_collection(&space).await?;
    }

    let batch = cfg.upsert_batch.max(1);
    let pb = progress_bar(items.len() as u64, "upserting");
    let mut total = 0u64;

    for (chunk_items, chunk_vectors) in items.chunks(batch).zip(vectors.chunks(batch)) {
        let points: Vec<PointStruct> = chunk_items
            .iter()
            .zip(chunk_vectors)
            .map(|(item, vector)| build_point(item, vector.clone()))
            .collect();
        let n = facade.upsert_points(points).await?;
        total += n;
        pb.inc(n);
    }

    pb.finish_and_clear();
    info!(total, dim = size, "index built");
    Ok(total)
}

fn build_point(item: &IndexItem, vector: Vec<f32>) -> PointStruct {
    let payload: HashMap<String, QValue> = item
        .payload
        .iter()
        .map(|(k, v)| (k.clone(), json_to_qvalue(v.clone())))
        .collect();

    PointStruct::new(stable_uuid(&item.key).to_string(), vector, payload)
}

fn progress_bar(len: u64, label: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    match ProgressStyle::with_template(
        "{spinner:.green} {msg} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    ) {
        Ok(style) => pb.set_style(style.progress_chars("##-")),
        Err(e) => debug!("progress template rejected: {e}"),
    }
    pb.set_message(label);
    pb
}

/// Converts `serde_json::Value` into Qdrant `Value` (handles arrays/objects).
fn json_to_qvalue(v: Value) -> QValue {
    use value::Kind as K;
    let kind = match v {
        Value::String(s) => Some(K::StringValue(s)),
        Value::Number(n) => Some(match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => K::IntegerValue(i),
            (None, Some(f)) => K::DoubleValue(f),
            (None, None) => K::StringValue(n.to_string()),
        }),
        Value::Bool(b) => Some(K::BoolValue(b)),
        Value::Array(arr) => Some(K::ListValue(ListValue {
            values: arr.into_iter().map(json_to_qvalue).collect(),
        })),
        Value::Object(map) => Some(K::StructValue(Struct {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, json_to_qvalue(v)))
                .collect(),
        })),
        Value::Null => None,
    };
    QValue { kind }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ChunkMetadata;

    fn entry(id: &str, variations: &[&str]) -> FaqEntry {
        FaqEntry {
            id: id.into(),
            question: format!("{id}?"),
            answer: format!("answer {id}"),
            variations: variations.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn faq_items_cover_questions_and_variations_in_order() {
        let items = faq_items(&[entry("faq_001", &["v1", "v2"]), entry("faq_002", &[])]);

        let keys: Vec<&str> = items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, ["faq_001#0", "faq_001#1", "faq_001#2", "faq_002#0"]);

        let ordinals: Vec<u64> = items
            .iter()
            .map(|i| i.payload[fields::ORDINAL].as_u64().unwrap())
            .collect();
        assert_eq!(ordinals, [0, 1, 2, 3]);

        assert_eq!(items[0].payload[fields::KIND], "main_question");
        assert_eq!(items[1].payload[fields::KIND], "variation");
        assert_eq!(items[2].payload[fields::ANSWER], "answer faq_001");
        assert_eq!(items[3].payload[fields::FAQ_ID], "faq_002");
    }

    #[test]
    fn blank_variations_are_skipped_without_gaps() {
        let items = faq_items(&[entry("faq_001", &["  ", "real"])]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].key, "faq_001#2");
        assert_eq!(items[1].payload[fields::ORDINAL], 1);
    }

    #[test]
    fn document_items_embed_augmented_content() {
        let chunks = vec![
            DocumentChunk {
                id: "doc_1".into(),
                original_content: "raw".into(),
                augmented_content: "augmented".into(),
                summary: "short".into(),
                metadata: ChunkMetadata {
                    url: Some("https://college.example/a".into()),
                    title: Some("A".into()),
                    section: None,
                },
            },
            DocumentChunk {
                id: "doc_2".into(),
                original_content: String::new(),
                augmented_content: "second".into(),
                summary: String::new(),
                metadata: ChunkMetadata::default(),
            },
        ];

        let items = document_items(&chunks);
        assert_eq!(items[0].text, "augmented");
        assert_eq!(items[0].payload[fields::URL], "https://college.example/a");
        assert!(!items[0].payload.contains_key(fields::SECTION));
        assert!(!items[1].payload.contains_key(fields::URL));
        assert_eq!(items[1].payload[fields::ORDINAL], 1);
    }

    #[test]
    fn json_numbers_keep_integer_kind() {
        let q = json_to_qvalue(json!(7));
        assert!(matches!(q.kind, Some(value::Kind::IntegerValue(7))));
        assert!(json_to_qvalue(Value::Null).kind.is_none());
    }
}
