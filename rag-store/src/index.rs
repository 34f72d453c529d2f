//! Read side of the store: scored similarity search over one collection.

use std::{future::Future, pin::Pin};

use tracing::{debug, info, instrument};

use crate::config::{DistanceKind, RagConfig};
use crate::errors::RagError;
use crate::qdrant_facade::QdrantFacade;
use crate::record::RetrievalHit;

/// A persisted similarity index queried by vector.
///
/// Implementations return hits sorted by descending score; scores are
/// similarities in `[0, 1]`, higher meaning more similar.
pub trait SimilarityIndex: Send + Sync {
    /// Top-`k` items for `vector`, optionally pre-filtered by `score_threshold`.
    fn query<'a>(
        &'a self,
        vector: &'a [f32],
        k: u64,
        score_threshold: Option<f32>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RetrievalHit>, RagError>> + Send + 'a>>;

    /// Number of stored items.
    fn count<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<u64, RagError>> + Send + 'a>>;

    /// Human-readable name used in logs.
    fn name(&self) -> &str;
}

/// [`SimilarityIndex`] backed by a Qdrant collection.
pub struct QdrantIndex {
    facade: QdrantFacade,
    exact: bool,
}

impl QdrantIndex {
    /// Opens an existing collection and checks that it can serve similarity scores.
    ///
    /// # Errors
    /// - [`RagError::Config`] if the collection is missing, is not cosine,
    ///   or uses named/multi vectors.
    /// - [`RagError::VectorSizeMismatch`] if `expected_dim` disagrees with the
    ///   stored vector size.
    /// - [`RagError::Qdrant`] on transport failures.
    #[instrument(skip_all, fields(collection = %cfg.collection))]
    pub async fn open(cfg: &RagConfig, expected_dim: Option<usize>) -> Result<Self, RagError> {
        let facade = QdrantFacade::new(cfg)?;

        if !facade.exists().await? {
            return Err(RagError::Config(format!(
                "collection '{}' does not exist; build the index first",
                cfg.collection
            )));
        }

        let params = facade.vector_params().await?.ok_or_else(|| {
            RagError::Config(format!(
                "collection '{}' has no single unnamed vector",
                cfg.collection
            ))
        })?;

        if params.distance != Some(DistanceKind::Cosine) {
            return Err(RagError::Config(format!(
                "collection '{}' uses {:?}; cosine similarity is required",
                cfg.collection, params.distance
            )));
        }

        if let Some(want) = expected_dim {
            if params.size as usize != want {
                return Err(RagError::VectorSizeMismatch {
                    got: params.size as usize,
                    want,
                });
            }
        }

        info!(dim = params.size, "similarity index opened");
        Ok(Self {
            facade,
            exact: cfg.exact_search,
        })
    }
}

impl SimilarityIndex for QdrantIndex {
    fn query<'a>(
        &'a self,
        vector: &'a [f32],
        k: u64,
        score_threshold: Option<f32>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RetrievalHit>, RagError>> + Send + 'a>> {
        Box::pin(async move {
            if k == 0 {
                return Ok(Vec::new());
            }

            let raw = self
                .facade
                .search(vector.to_vec(), k, score_threshold, self.exact)
                .await?;

            let hits: Vec<RetrievalHit> = raw
                .into_iter()
                .map(|p| RetrievalHit {
                    item_id: p.id,
                    score: clamp_unit(p.score),
                    metadata: p.payload,
                })
                .collect();

            debug!(
                collection = self.facade.collection(),
                hits = hits.len(),
                top = hits.first().map(|h| h.score),
                "index query done"
            );
            Ok(hits)
        })
    }

    fn count<'a>(&'a self) -> Pin<Box<dyn Future<Output = Result<u64, RagError>> + Send + 'a>> {
        Box::pin(self.facade.count())
    }

    fn name(&self) -> &str {
        self.facade.collection()
    }
}

/// Cosine can dip below zero for opposed vectors and drift past one by rounding.
fn clamp_unit(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_are_clamped_to_unit_range() {
        assert_eq!(clamp_unit(-0.2), 0.0);
        assert_eq!(clamp_unit(1.000_001), 1.0);
        assert_eq!(clamp_unit(0.93), 0.93);
        assert_eq!(clamp_unit(f32::NAN), 0.0);
    }
}
