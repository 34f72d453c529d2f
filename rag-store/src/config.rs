//! Runtime and collection configuration.

use std::str::FromStr;

use crate::errors::RagError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine similarity; the only metric whose scores are normalized similarities.
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Describes the vector space of the collection.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Configuration for one Qdrant collection (FAQ or Document index).
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Upsert batch size (typical range: 128..512).
    pub upsert_batch: usize,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    /// Expected embedding dimension; enforced when set.
    pub embedding_dim: Option<usize>,
    /// Parallel embedding requests during indexing.
    pub embedding_concurrency: usize,
}

/// Names of the two collections the service reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionNames {
    pub faq: String,
    pub documents: String,
}

impl CollectionNames {
    /// `FAQ_COLLECTION` (default `faq_index`) and `DOC_COLLECTION` (default `doc_index`).
    pub fn from_env() -> Self {
        Self {
            faq: env_or("FAQ_COLLECTION", "faq_index"),
            documents: env_or("DOC_COLLECTION", "doc_index"),
        }
    }
}

impl RagConfig {
    /// Creates a sane default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            upsert_batch: 256,
            exact_search: false,
            embedding_dim: None,
            embedding_concurrency: 4,
        }
    }

    /// Reads the shared Qdrant settings from env for the given collection.
    ///
    /// Variables: `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_BATCH_SIZE`,
    /// `RAG_EXACT_SEARCH`, `EMBEDDING_DIM`, `EMBEDDING_CONCURRENCY`.
    ///
    /// # Errors
    /// [`RagError::Config`] when a numeric/boolean variable is set but malformed,
    /// or when the resulting config fails [`RagConfig::validate`].
    pub fn from_env(collection: impl Into<String>) -> Result<Self, RagError> {
        let mut cfg = Self::new_default(
            env_or("QDRANT_URL", "http://127.0.0.1:6334"),
            collection,
        );
        cfg.qdrant_api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty());
        cfg.upsert_batch = read_env("QDRANT_BATCH_SIZE")?.unwrap_or(cfg.upsert_batch);
        cfg.exact_search = read_env("RAG_EXACT_SEARCH")?.unwrap_or(false);
        cfg.embedding_dim = read_env("EMBEDDING_DIM")?;
        cfg.embedding_concurrency =
            read_env("EMBEDDING_CONCURRENCY")?.unwrap_or(cfg.embedding_concurrency);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Same endpoint settings, different collection.
    pub fn with_collection(&self, collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..self.clone()
        }
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.upsert_batch == 0 {
            return Err(RagError::Config("upsert_batch must be > 0".into()));
        }
        if self.embedding_dim == Some(0) {
            return Err(RagError::Config("embedding_dim must be > 0".into()));
        }
        Ok(())
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parses an optional env var; set-but-malformed is an error, not a default.
fn read_env<T: FromStr>(key: &str) -> Result<Option<T>, RagError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| RagError::Config(format!("{key} has an invalid value: {v:?}"))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = RagConfig::new_default("http://localhost:6334", "faq_index");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.distance, DistanceKind::Cosine);
    }

    #[test]
    fn with_collection_keeps_endpoint() {
        let cfg = RagConfig::new_default("http://q:6334", "faq_index");
        let doc = cfg.with_collection("doc_index");
        assert_eq!(doc.collection, "doc_index");
        assert_eq!(doc.qdrant_url, "http://q:6334");
    }

    #[test]
    fn zero_batch_is_rejected() {
        let mut cfg = RagConfig::new_default("http://q:6334", "faq_index");
        cfg.upsert_batch = 0;
        assert!(matches!(cfg.validate(), Err(RagError::Config(_))));
    }
}
