//! Tier 3: ungrounded answer with a disclaimer. Never misses.

use tracing::{instrument, warn};

use crate::api_types::QueryResult;
use crate::engine::EngineContext;
use crate::llm::generate_with_timeout;
use crate::prompt::{APOLOGY, APOLOGY_CONFIDENCE, DISCLAIMER, FALLBACK_CONFIDENCE, build_fallback_prompt};

/// Generated text plus [`DISCLAIMER`] at 0.30, or [`APOLOGY`] at 0.10 when
/// the provider fails or times out.
#[instrument(skip_all, fields(tier = "fallback"))]
pub async fn generate(ctx: &EngineContext, query: &str) -> QueryResult {
    let prompt = build_fallback_prompt(query);

    match generate_with_timeout(ctx.generator.as_ref(), &prompt, ctx.config.generation_timeout)
        .await
    {
        Ok(text) => QueryResult::fallback(format!("{text}{DISCLAIMER}"), FALLBACK_CONFIDENCE),
        Err(e) => {
            warn!(error = %e, "fallback tier: answering with apology");
            QueryResult::fallback(APOLOGY.to_string(), APOLOGY_CONFIDENCE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_types::Tier;
    use crate::test_support::{ContextBuilder, GenBehavior};

    #[tokio::test]
    async fn generated_text_gets_disclaimer() {
        let ctx = ContextBuilder::new()
            .generator(GenBehavior::Reply("Campus tours run on Saturdays.".into()))
            .build();

        let r = generate(&ctx, "Can I visit the campus?").await;
        assert_eq!(r.tier, Tier::Fallback);
        assert_eq!(r.confidence, 0.30);
        assert!(r.content.starts_with("Campus tours run on Saturdays."));
        assert!(r.content.ends_with(DISCLAIMER));
        assert!(r.sources.is_empty() && r.document_ids.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_gives_apology() {
        let ctx = ContextBuilder::new().generator(GenBehavior::Fail).build();

        let r = generate(&ctx, "q").await;
        assert_eq!(r.content, APOLOGY);
        assert_eq!(r.confidence, 0.10);
    }
}
