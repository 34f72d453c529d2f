//! Tier 1: curated FAQ match, best-of-one.

use rag_store::fields;
use tracing::{debug, instrument, warn};

use crate::api_types::{QueryResult, Tier};
use crate::engine::EngineContext;
use crate::scoring::{meets_threshold, rank_hits};
use crate::tiers::{MissReason, TierOutcome};

/// Looks the query up in the FAQ index and accepts only the single best hit
/// when it clears `faq_threshold`. Failures become a miss.
#[instrument(skip_all, fields(tier = "faq"))]
pub async fn match_faq(ctx: &EngineContext, query: &str) -> TierOutcome {
    let cfg = &ctx.config;

    let vector = match ctx.embedder.embed(query).await {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "FAQ tier: embedding failed");
            return TierOutcome::Miss(MissReason::ProviderFailure(e.to_string()));
        }
    };

    let hits = match ctx.faq_index.query(&vector, cfg.faq_limit, None).await {
        Ok(h) => h,
        Err(e) => {
            warn!(index = ctx.faq_index.name(), error = %e, "FAQ tier: index query failed");
            return TierOutcome::Miss(MissReason::ProviderFailure(e.to_string()));
        }
    };

    let Some(best) = rank_hits(hits).into_iter().next() else {
        debug!("FAQ tier: index returned nothing");
        return TierOutcome::Miss(MissReason::NoCandidates);
    };

    if !meets_threshold(best.score, cfg.faq_threshold) {
        debug!(best = best.score, threshold = cfg.faq_threshold, "FAQ tier: below threshold");
        return TierOutcome::Miss(MissReason::BelowThreshold {
            confidence: best.score,
            threshold: cfg.faq_threshold,
        });
    }

    let Some(answer) = best.meta_str(fields::ANSWER) else {
        warn!(item = %best.item_id, "FAQ tier: best hit has no answer");
        return TierOutcome::Miss(MissReason::MalformedHit(format!(
            "item {} has no answer",
            best.item_id
        )));
    };

    debug!(score = best.score, item = %best.item_id, "FAQ tier: accepted");
    TierOutcome::Hit(QueryResult {
        tier: Tier::Faq,
        content: answer.to_string(),
        confidence: best.score,
        sources: Vec::new(),
        faq_id: best.meta_str(fields::FAQ_ID).map(str::to_string),
        document_ids: Vec::new(),
        matched_question: best.meta_str(fields::TEXT).map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ContextBuilder, faq_hit};

    #[tokio::test]
    async fn exact_question_is_accepted_with_its_score() {
        let ctx = ContextBuilder::new()
            .faq_hits(vec![faq_hit("faq_001", "What are the admission requirements?", 0.99, 0)])
            .build();

        let TierOutcome::Hit(r) = match_faq(&ctx, "What are the admission requirements?").await
        else {
            panic!("expected a hit");
        };
        assert_eq!(r.faq_id.as_deref(), Some("faq_001"));
        assert_eq!(r.confidence, 0.99);
        assert_eq!(
            r.matched_question.as_deref(),
            Some("What are the admission requirements?")
        );
    }

    #[tokio::test]
    async fn only_best_hit_is_considered() {
        let ctx = ContextBuilder::new()
            .faq_hits(vec![
                faq_hit("faq_002", "Is there a hostel?", 0.89, 3),
                faq_hit("faq_003", "Hostel fees?", 0.85, 4),
            ])
            .build();

        let TierOutcome::Miss(MissReason::BelowThreshold { confidence, .. }) =
            match_faq(&ctx, "hostel").await
        else {
            panic!("expected a below-threshold miss");
        };
        assert_eq!(confidence, 0.89);
    }

    #[tokio::test]
    async fn unsorted_index_response_is_reranked() {
        let ctx = ContextBuilder::new()
            .faq_hits(vec![
                faq_hit("faq_002", "Is there a hostel?", 0.89, 3),
                faq_hit("faq_003", "Hostel fees?", 0.95, 4),
            ])
            .build();

        let TierOutcome::Hit(r) = match_faq(&ctx, "hostel").await else {
            panic!("expected a hit");
        };
        assert_eq!(r.faq_id.as_deref(), Some("faq_003"));
        assert_eq!(r.confidence, 0.95);
    }

    #[tokio::test]
    async fn score_just_under_threshold_is_a_miss() {
        let ctx = ContextBuilder::new()
            .faq_hits(vec![faq_hit("faq_001", "Q", 0.8999995, 0)])
            .build();

        assert!(matches!(
            match_faq(&ctx, "Q").await,
            TierOutcome::Miss(MissReason::BelowThreshold { .. })
        ));
    }

    #[tokio::test]
    async fn tie_goes_to_first_indexed_item() {
        let ctx = ContextBuilder::new()
            .faq_hits(vec![
                faq_hit("faq_009", "Application deadline?", 0.93, 12),
                faq_hit("faq_004", "When is the application deadline?", 0.93, 5),
            ])
            .build();

        let TierOutcome::Hit(r) = match_faq(&ctx, "deadline").await else {
            panic!("expected a hit");
        };
        assert_eq!(r.faq_id.as_deref(), Some("faq_004"));
    }

    #[tokio::test]
    async fn index_failure_is_a_miss() {
        let ctx = ContextBuilder::new().failing_faq_index().build();
        assert!(matches!(
            match_faq(&ctx, "anything").await,
            TierOutcome::Miss(MissReason::ProviderFailure(_))
        ));
    }

    #[tokio::test]
    async fn embedding_failure_is_a_miss() {
        let ctx = ContextBuilder::new()
            .faq_hits(vec![faq_hit("faq_001", "Q", 1.0, 0)])
            .failing_embedder()
            .build();
        assert!(matches!(
            match_faq(&ctx, "Q").await,
            TierOutcome::Miss(MissReason::ProviderFailure(_))
        ));
    }
}
