//! Decision engine: FAQ → Document → Fallback, first confident tier wins.

use std::sync::Arc;

use rag_store::{EmbeddingsProvider, SimilarityIndex, load_faq_entries, total_variations};
use tracing::{debug, info, instrument, warn};

use crate::api_types::{EngineStats, QueryResult, Tier};
use crate::cfg::EngineConfig;
use crate::llm::GenerationProvider;
use crate::scoring::{mean_meets_threshold, meets_threshold};
use crate::tiers::{self, TierOutcome};

/// Process-lifetime handles shared by all tiers; read-only after construction.
#[derive(Clone)]
pub struct EngineContext {
    pub config: EngineConfig,
    pub embedder: Arc<dyn EmbeddingsProvider>,
    pub faq_index: Arc<dyn SimilarityIndex>,
    pub document_index: Arc<dyn SimilarityIndex>,
    pub generator: Arc<dyn GenerationProvider>,
}

impl EngineContext {
    pub fn new(
        config: EngineConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
        faq_index: Arc<dyn SimilarityIndex>,
        document_index: Arc<dyn SimilarityIndex>,
        generator: Arc<dyn GenerationProvider>,
    ) -> Self {
        Self {
            config,
            embedder,
            faq_index,
            document_index,
            generator,
        }
    }
}

/// Steps of one `answer()` call. Strictly forward, no retries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EngineState {
    Start,
    FaqAttempted,
    DocAttempted,
    Fallback,
    Done,
}

impl EngineState {
    /// State in which a result of `tier` is produced.
    fn producing(tier: Tier) -> Self {
        match tier {
            Tier::Faq => EngineState::FaqAttempted,
            Tier::Document => EngineState::DocAttempted,
            Tier::Fallback => EngineState::Fallback,
        }
    }
}

/// Stateless across queries; safe to share behind an `Arc`.
#[derive(Clone)]
pub struct DecisionEngine {
    ctx: EngineContext,
}

impl DecisionEngine {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Answers one question. Always returns a well-formed result.
    ///
    /// # Example
    /// ```no_run
    /// # async fn demo(engine: urag_engine::DecisionEngine) {
    /// let r = engine.answer("What are the admission requirements?").await;
    /// println!("{} ({:.2}): {}", r.tier, r.confidence, r.content);
    /// # }
    /// ```
    #[instrument(skip_all, fields(query_len = query.len()))]
    pub async fn answer(&self, query: &str) -> QueryResult {
        let mut state = EngineState::Start;
        debug!(?state, "answering");

        state = EngineState::FaqAttempted;
        debug!(?state, "trying FAQ");
        match tiers::faq::match_faq(&self.ctx, query).await {
            TierOutcome::Hit(r) if self.accepts(&r) => return self.finish(state, r),
            TierOutcome::Hit(r) => debug!(confidence = r.confidence, "FAQ result gated out"),
            TierOutcome::Miss(reason) => debug!(%reason, "FAQ tier missed"),
        }

        state = EngineState::DocAttempted;
        debug!(?state, "trying documents");
        match tiers::document::retrieve_and_generate(&self.ctx, query).await {
            TierOutcome::Hit(r) if self.accepts(&r) => return self.finish(state, r),
            TierOutcome::Hit(r) => debug!(
                confidence = r.confidence,
                threshold = self.ctx.config.doc_threshold,
                "document result gated out"
            ),
            TierOutcome::Miss(reason) => debug!(%reason, "document tier missed"),
        }

        state = EngineState::Fallback;
        debug!(?state, "falling back");
        let r = tiers::fallback::generate(&self.ctx, query).await;
        self.finish(state, r)
    }

    /// Gate applied to every tier hit: the best FAQ score must reach
    /// `faq_threshold`, the mean document score `doc_threshold`.
    fn accepts(&self, r: &QueryResult) -> bool {
        let cfg = &self.ctx.config;
        match r.tier {
            Tier::Faq => meets_threshold(r.confidence, cfg.faq_threshold),
            Tier::Document => mean_meets_threshold(r.confidence, cfg.doc_threshold),
            Tier::Fallback => true,
        }
    }

    fn finish(&self, from: EngineState, r: QueryResult) -> QueryResult {
        debug_assert_eq!(from, EngineState::producing(r.tier));
        debug!(?from, to = ?EngineState::Done, "done");
        info!(
            tier = %r.tier,
            confidence = r.confidence,
            sources = r.sources.len(),
            "query answered"
        );
        r
    }

    /// Index counts from index metadata, variations from the FAQ records file.
    /// A failing part is logged and reported as 0.
    pub async fn stats(&self) -> EngineStats {
        let faq_count = self.ctx.faq_index.count().await.unwrap_or_else(|e| {
            warn!(index = self.ctx.faq_index.name(), error = %e, "stats: FAQ count failed");
            0
        });
        let document_count = self.ctx.document_index.count().await.unwrap_or_else(|e| {
            warn!(index = self.ctx.document_index.name(), error = %e, "stats: document count failed");
            0
        });

        let path = self.ctx.config.faq_records_file.clone();
        let total_variations = match tokio::task::spawn_blocking(move || load_faq_entries(path)).await
        {
            Ok(Ok(entries)) => total_variations(&entries) as u64,
            Ok(Err(e)) => {
                warn!(error = %e, "stats: FAQ records unreadable");
                0
            }
            Err(e) => {
                warn!(error = %e, "stats: reader task failed");
                0
            }
        };

        EngineStats {
            faq_count,
            document_count,
            total_variations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{APOLOGY, DISCLAIMER};
    use crate::test_support::{ContextBuilder, GenBehavior, TestContext, doc_hit, faq_hit};

    fn engine(builder: ContextBuilder) -> (DecisionEngine, TestContext) {
        let t = builder.build();
        (DecisionEngine::new(t.ctx.clone()), t)
    }

    #[tokio::test]
    async fn example_exact_faq_question() {
        let (e, _t) = engine(ContextBuilder::new().faq_hits(vec![faq_hit(
            "faq_001",
            "What are the admission requirements?",
            1.0,
            0,
        )]));

        let r = e.answer("What are the admission requirements?").await;
        assert_eq!(r.tier, Tier::Faq);
        assert_eq!(r.faq_id.as_deref(), Some("faq_001"));
        assert!(r.confidence >= 0.90);
    }

    #[tokio::test]
    async fn example_boundary_mean_goes_to_documents() {
        let (e, _t) = engine(
            ContextBuilder::new()
                .config(EngineConfig {
                    doc_chunk_threshold: 0.75,
                    ..EngineConfig::default()
                })
                .faq_hits(vec![faq_hit("faq_001", "Q", 0.70, 0)])
                .doc_hits(vec![
                    doc_hit("doc_1", Some("https://c.example/a"), 0.82, 0),
                    doc_hit("doc_2", Some("https://c.example/b"), 0.78, 1),
                ]),
        );

        let r = e.answer("q").await;
        assert_eq!(r.tier, Tier::Document);
        assert!((r.confidence - 0.80).abs() < 1e-6);
        assert_eq!(r.document_ids, ["doc_1", "doc_2"]);
    }

    #[tokio::test]
    async fn example_mean_below_threshold_falls_back() {
        let (e, t) = engine(
            ContextBuilder::new()
                .config(EngineConfig {
                    doc_chunk_threshold: 0.75,
                    ..EngineConfig::default()
                })
                .doc_hits(vec![
                    doc_hit("doc_1", None, 0.80, 0),
                    doc_hit("doc_2", None, 0.78, 1),
                ]),
        );

        let r = e.answer("q").await;
        assert_eq!(r.tier, Tier::Fallback);
        assert_eq!(r.confidence, 0.30);
        assert!(r.content.ends_with(DISCLAIMER));
        // the document tier answered at 0.79 and the engine rejected it
        assert_eq!(t.generation_calls(), 2);
    }

    #[tokio::test]
    async fn faq_score_just_under_threshold_is_not_an_faq_answer() {
        let (e, _t) = engine(
            ContextBuilder::new()
                .faq_hits(vec![faq_hit("faq_001", "Q", 0.8999995, 0)])
                .doc_hits(vec![doc_hit("doc_1", None, 0.95, 0)]),
        );

        let r = e.answer("q").await;
        assert_eq!(r.tier, Tier::Document);
        assert!((r.confidence - 0.95).abs() < 1e-6);
    }

    #[test]
    fn each_tier_finishes_from_its_own_state() {
        assert_eq!(EngineState::producing(Tier::Faq), EngineState::FaqAttempted);
        assert_eq!(EngineState::producing(Tier::Document), EngineState::DocAttempted);
        assert_eq!(EngineState::producing(Tier::Fallback), EngineState::Fallback);
    }

    #[test]
    fn gate_checks_each_tier_against_its_threshold() {
        let (e, _t) = engine(ContextBuilder::new());
        let hit = |tier: Tier, confidence: f32| QueryResult {
            tier,
            content: "a".into(),
            confidence,
            sources: Vec::new(),
            faq_id: None,
            document_ids: Vec::new(),
            matched_question: None,
        };

        assert!(e.accepts(&hit(Tier::Faq, 0.90)));
        assert!(!e.accepts(&hit(Tier::Faq, 0.8999995)));
        assert!(e.accepts(&hit(Tier::Document, 0.7999995)));
        assert!(!e.accepts(&hit(Tier::Document, 0.79)));
        assert!(e.accepts(&hit(Tier::Fallback, 0.10)));
    }

    #[tokio::test]
    async fn example_fallback_provider_failure() {
        let (e, _t) = engine(ContextBuilder::new().generator(GenBehavior::Fail));

        let r = e.answer("q").await;
        assert_eq!(r.tier, Tier::Fallback);
        assert_eq!(r.content, APOLOGY);
        assert_eq!(r.confidence, 0.10);
    }

    #[tokio::test]
    async fn faq_wins_over_documents() {
        let (e, t) = engine(
            ContextBuilder::new()
                .faq_hits(vec![faq_hit("faq_007", "Hostel?", 0.91, 0)])
                .doc_hits(vec![doc_hit("doc_1", None, 0.99, 0)]),
        );

        let r = e.answer("hostel").await;
        assert_eq!(r.tier, Tier::Faq);
        assert_eq!(r.confidence, 0.91);
        assert_eq!(t.generation_calls(), 0);
    }

    #[tokio::test]
    async fn faq_failure_does_not_stop_documents() {
        let (e, _t) = engine(
            ContextBuilder::new()
                .failing_faq_index()
                .doc_hits(vec![doc_hit("doc_1", Some("https://c.example/a"), 0.88, 0)]),
        );

        let r = e.answer("q").await;
        assert_eq!(r.tier, Tier::Document);
        assert_eq!(r.sources, ["https://c.example/a"]);
    }

    #[tokio::test]
    async fn document_generation_failure_falls_through_to_apology() {
        let (e, t) = engine(
            ContextBuilder::new()
                .doc_hits(vec![doc_hit("doc_1", None, 0.95, 0)])
                .generator(GenBehavior::Fail),
        );

        let r = e.answer("q").await;
        assert_eq!(r.tier, Tier::Fallback);
        assert_eq!(r.confidence, 0.10);
        assert_eq!(t.generation_calls(), 2);
    }

    #[tokio::test]
    async fn everything_failing_still_answers() {
        let (e, _t) = engine(
            ContextBuilder::new()
                .failing_embedder()
                .failing_faq_index()
                .failing_doc_index()
                .generator(GenBehavior::Fail),
        );

        let r = e.answer("q").await;
        assert_eq!(r.tier, Tier::Fallback);
        assert_eq!(r.content, APOLOGY);
    }

    #[tokio::test]
    async fn repeated_queries_are_stable() {
        let (e, _t) = engine(
            ContextBuilder::new()
                .faq_hits(vec![faq_hit("faq_001", "Q", 0.85, 0)])
                .doc_hits(vec![doc_hit("doc_1", None, 0.83, 0)]),
        );

        let a = e.answer("q").await;
        let b = e.answer("q").await;
        assert_eq!((a.tier, a.confidence), (b.tier, b.confidence));
        assert_eq!(a.tier, Tier::Document);
    }

    #[tokio::test]
    async fn stats_report_zero_for_failing_parts() {
        let (e, _t) = engine(
            ContextBuilder::new()
                .faq_hits(vec![faq_hit("faq_001", "Q", 0.5, 0)])
                .failing_doc_index()
                .config(EngineConfig {
                    faq_records_file: "/definitely/not/here.json".into(),
                    ..EngineConfig::default()
                }),
        );

        let s = e.stats().await;
        assert_eq!(s.faq_count, 1);
        assert_eq!(s.document_count, 0);
        assert_eq!(s.total_variations, 0);
    }
}
