//! Tier 2: retrieval over augmented document chunks + grounded generation.
//!
//! Confidence is the mean over *all* accepted chunks, including chunks that
//! carry no URL; those are only left out of `sources`. Gating that mean
//! against `doc_threshold` is the engine's job, not this tier's.

use rag_store::{RetrievalHit, fields};
use tracing::{debug, instrument, warn};

use crate::api_types::{QueryResult, Tier};
use crate::engine::EngineContext;
use crate::llm::generate_with_timeout;
use crate::prompt::build_document_prompt;
use crate::scoring::{distinct_in_order, mean_score, meets_threshold, rank_hits};
use crate::tiers::{MissReason, TierOutcome};

/// Retrieves up to `doc_limit` chunks clearing `doc_chunk_threshold` and
/// generates one answer from them. Any accepted chunk yields a hit carrying
/// the mean score; failures become a miss.
#[instrument(skip_all, fields(tier = "document"))]
pub async fn retrieve_and_generate(ctx: &EngineContext, query: &str) -> TierOutcome {
    let cfg = &ctx.config;

    let vector = match ctx.embedder.embed(query).await {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "document tier: embedding failed");
            return TierOutcome::Miss(MissReason::ProviderFailure(e.to_string()));
        }
    };

    let raw = match ctx
        .document_index
        .query(&vector, cfg.doc_limit, Some(cfg.doc_chunk_threshold))
        .await
    {
        Ok(h) => h,
        Err(e) => {
            warn!(index = ctx.document_index.name(), error = %e, "document tier: index query failed");
            return TierOutcome::Miss(MissReason::ProviderFailure(e.to_string()));
        }
    };

    let accepted: Vec<RetrievalHit> = rank_hits(raw)
        .into_iter()
        .filter(|h| meets_threshold(h.score, cfg.doc_chunk_threshold))
        .take(cfg.doc_limit as usize)
        .collect();

    let Some(confidence) = mean_score(&accepted) else {
        debug!("document tier: no chunk cleared the per-chunk threshold");
        return TierOutcome::Miss(MissReason::NoCandidates);
    };

    let mut contexts = Vec::with_capacity(accepted.len());
    for h in &accepted {
        match h.meta_str(fields::TEXT) {
            Some(text) => contexts.push(text),
            None => {
                warn!(item = %h.item_id, "document tier: chunk has no text");
                return TierOutcome::Miss(MissReason::MalformedHit(format!(
                    "item {} has no text",
                    h.item_id
                )));
            }
        }
    }

    let prompt = build_document_prompt(query, &contexts);
    let content =
        match generate_with_timeout(ctx.generator.as_ref(), &prompt, cfg.generation_timeout).await
        {
            Ok(text) => text,
            Err(e) => return TierOutcome::Miss(MissReason::ProviderFailure(e.to_string())),
        };

    let sources = distinct_in_order(accepted.iter().filter_map(|h| h.meta_str(fields::URL)));
    let document_ids = accepted
        .iter()
        .map(|h| {
            h.meta_str(fields::DOC_ID)
                .unwrap_or(h.item_id.as_str())
                .to_string()
        })
        .collect();

    debug!(chunks = accepted.len(), confidence, "document tier: answered");
    TierOutcome::Hit(QueryResult {
        tier: Tier::Document,
        content,
        confidence,
        sources,
        faq_id: None,
        document_ids,
        matched_question: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::EngineConfig;
    use crate::test_support::{ContextBuilder, GenBehavior, doc_hit};

    #[tokio::test]
    async fn mean_of_accepted_chunks_is_the_confidence() {
        let ctx = ContextBuilder::new()
            .doc_hits(vec![
                doc_hit("doc_1", Some("https://c.example/fees"), 0.90, 0),
                doc_hit("doc_2", Some("https://c.example/dates"), 0.84, 1),
            ])
            .generator(GenBehavior::Reply("Fees are due in July.".into()))
            .build();

        let TierOutcome::Hit(r) = retrieve_and_generate(&ctx, "When are fees due?").await else {
            panic!("expected a hit");
        };
        assert!((r.confidence - 0.87).abs() < 1e-6);
        assert_eq!(r.content, "Fees are due in July.");
        assert_eq!(r.document_ids, ["doc_1", "doc_2"]);
        assert_eq!(r.sources, ["https://c.example/fees", "https://c.example/dates"]);
    }

    #[tokio::test]
    async fn chunk_without_url_counts_toward_confidence_but_not_sources() {
        let ctx = ContextBuilder::new()
            .doc_hits(vec![
                doc_hit("doc_1", Some("https://c.example/a"), 0.96, 0),
                doc_hit("doc_2", None, 0.82, 1),
            ])
            .build();

        let TierOutcome::Hit(r) = retrieve_and_generate(&ctx, "q").await else {
            panic!("expected a hit");
        };
        assert!((r.confidence - 0.89).abs() < 1e-6);
        assert_eq!(r.sources, ["https://c.example/a"]);
        assert_eq!(r.document_ids.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_urls_collapse_and_ids_keep_rank_order() {
        let ctx = ContextBuilder::new()
            .doc_hits(vec![
                doc_hit("doc_b", Some("https://c.example/x"), 0.85, 4),
                doc_hit("doc_a", Some("https://c.example/x"), 0.91, 9),
            ])
            .build();

        let TierOutcome::Hit(r) = retrieve_and_generate(&ctx, "q").await else {
            panic!("expected a hit");
        };
        assert_eq!(r.document_ids, ["doc_a", "doc_b"]);
        assert_eq!(r.sources, ["https://c.example/x"]);
    }

    #[tokio::test]
    async fn prompt_contains_augmented_chunks_in_rank_order() {
        let ctx = ContextBuilder::new()
            .doc_hits(vec![
                doc_hit("doc_1", None, 0.95, 0),
                doc_hit("doc_2", None, 0.90, 1),
            ])
            .build();

        retrieve_and_generate(&ctx, "Where is the campus?").await;
        let prompts = ctx.recorded_prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Context: augmented doc_1\n\naugmented doc_2"));
        assert!(prompts[0].contains("Question: Where is the campus?"));
    }

    #[tokio::test]
    async fn chunks_below_per_chunk_threshold_are_dropped() {
        let ctx = ContextBuilder::new()
            .doc_hits(vec![
                doc_hit("doc_1", None, 0.92, 0),
                doc_hit("doc_2", None, 0.50, 1),
            ])
            .build();

        let TierOutcome::Hit(r) = retrieve_and_generate(&ctx, "q").await else {
            panic!("expected a hit");
        };
        assert_eq!(r.document_ids, ["doc_1"]);
        assert!((r.confidence - 0.92).abs() < 1e-6);
    }

    #[tokio::test]
    async fn nothing_above_threshold_skips_generation() {
        let ctx = ContextBuilder::new()
            .doc_hits(vec![doc_hit("doc_1", None, 0.60, 0)])
            .build();

        assert_eq!(
            retrieve_and_generate(&ctx, "q").await,
            TierOutcome::Miss(MissReason::NoCandidates)
        );
        assert_eq!(ctx.generation_calls(), 0);
    }

    #[tokio::test]
    async fn low_mean_is_returned_for_the_engine_to_gate() {
        let ctx = ContextBuilder::new()
            .config(EngineConfig {
                doc_chunk_threshold: 0.75,
                ..EngineConfig::default()
            })
            .doc_hits(vec![
                doc_hit("doc_1", None, 0.80, 0),
                doc_hit("doc_2", None, 0.76, 1),
            ])
            .build();

        let TierOutcome::Hit(r) = retrieve_and_generate(&ctx, "q").await else {
            panic!("expected a hit");
        };
        assert!((r.confidence - 0.78).abs() < 1e-6);
        assert_eq!(ctx.generation_calls(), 1);
    }

    #[tokio::test]
    async fn generation_failure_is_a_miss() {
        let ctx = ContextBuilder::new()
            .doc_hits(vec![doc_hit("doc_1", None, 0.95, 0)])
            .generator(GenBehavior::Fail)
            .build();

        assert!(matches!(
            retrieve_and_generate(&ctx, "q").await,
            TierOutcome::Miss(MissReason::ProviderFailure(_))
        ));
    }

    #[tokio::test]
    async fn generation_timeout_is_a_miss() {
        let ctx = ContextBuilder::new()
            .config(EngineConfig {
                generation_timeout: std::time::Duration::from_millis(50),
                ..EngineConfig::default()
            })
            .doc_hits(vec![doc_hit("doc_1", None, 0.95, 0)])
            .generator(GenBehavior::Hang)
            .build();

        assert!(matches!(
            retrieve_and_generate(&ctx, "q").await,
            TierOutcome::Miss(MissReason::ProviderFailure(_))
        ));
    }
}
