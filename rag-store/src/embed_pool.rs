//! Embedding executor with concurrency and dimension checks.

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use tracing::{debug, info};

use crate::{embed::EmbeddingsProvider, errors::RagError};

/// Embeds every text, preserving input order in the output.
///
/// # Arguments
/// - `texts`: texts to embed.
/// - `provider`: embedding backend.
/// - `expected_dim`: if `Some`, enforces this vector size; otherwise all
///   vectors must share the size of the first one.
/// - `concurrency`: maximum number of in-flight embedding requests.
/// - `progress`: optional bar advanced once per finished text.
///
/// # Errors
/// Returns [`RagError::VectorSizeMismatch`] if dimensions disagree,
/// or the provider's error if any call fails.
pub async fn embed_all(
    texts: &[String],
    provider: &dyn EmbeddingsProvider,
    expected_dim: Option<usize>,
    concurrency: usize,
    progress: Option<&ProgressBar>,
) -> Result<Vec<Vec<f32>>, RagError> {
    info!(
        "embed_pool::embed_all: total={} concurrency={}",
        texts.len(),
        concurrency
    );

    if texts.is_empty() {
        debug!("embed_pool::embed_all: nothing to embed");
        return Ok(Vec::new());
    }

    let mut results: Vec<(usize, Vec<f32>)> = stream::iter(texts.iter().enumerate())
        .map(|(i, text)| async move {
            let v = provider.embed(text).await?;
            if let Some(pb) = progress {
                pb.inc(1);
            }
            Ok::<(usize, Vec<f32>), RagError>((i, v))
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, RagError>>()?;

    results.sort_by_key(|(i, _)| *i);

    let want = expected_dim.unwrap_or_else(|| results[0].1.len());
    for (_, v) in &results {
        if v.len() != want {
            return Err(RagError::VectorSizeMismatch { got: v.len(), want });
        }
    }

    debug!("embed_pool::embed_all: {} vectors of dim {}", results.len(), want);
    Ok(results.into_iter().map(|(_, v)| v).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{future::Future, pin::Pin};

    /// Vector whose only component is the text length.
    struct LenEmbedder;

    impl EmbeddingsProvider for LenEmbedder {
        fn embed<'a>(
            &'a self,
            text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>> {
            Box::pin(async move { Ok(vec![text.len() as f32]) })
        }
    }

    #[tokio::test]
    async fn output_order_matches_input() {
        let texts: Vec<String> = (1..=20).map(|n| "x".repeat(n)).collect();
        let out = embed_all(&texts, &LenEmbedder, None, 8, None).await.unwrap();
        let lens: Vec<f32> = out.iter().map(|v| v[0]).collect();
        let want: Vec<f32> = (1..=20).map(|n| n as f32).collect();
        assert_eq!(lens, want);
    }

    #[tokio::test]
    async fn dimension_is_enforced() {
        let texts = vec!["a".to_string()];
        let err = embed_all(&texts, &LenEmbedder, Some(3), 1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::VectorSizeMismatch { got: 1, want: 3 }));
    }
}
