//! Vector storage for the tiered answering service.
//!
//! This crate provides:
//! - Loading of the persisted preparation artifacts (FAQ records, augmented documents)
//! - Index building: embed and upsert FAQ questions/variations and document chunks
//! - Scored similarity search through the [`SimilarityIndex`] trait
//!
//! The design is flat (no deep nesting) and splits responsibilities into focused modules.

mod config;
pub mod embed;
mod embed_pool;
mod errors;
mod ids;
mod index;
mod ingest;
mod io_json;
mod qdrant_facade;
mod record;

pub use config::{CollectionNames, DistanceKind, RagConfig, VectorSpace};
pub use embed::{EmbeddingsProvider, service_embedder::ServiceEmbedder};
pub use embed_pool::embed_all;
pub use errors::RagError;
pub use ids::stable_uuid;
pub use index::{QdrantIndex, SimilarityIndex};
pub use ingest::{document_items, faq_items};
pub use io_json::{load_document_chunks, load_faq_entries, total_variations};
pub use record::{
    ChunkMetadata, DocumentChunk, FaqEntry, FaqItemKind, IndexItem, RetrievalHit, fields,
};

use tracing::{debug, trace};

/// High-level facade that wires configuration and the Qdrant client for one collection.
///
/// This is the single entry point recommended for index building.
pub struct RagStore {
    cfg: RagConfig,
    client: qdrant_facade::QdrantFacade,
}

impl RagStore {
    /// Constructs a new store from the given configuration.
    ///
    /// # Errors
    /// Returns `RagError::Config` / `RagError::Qdrant` if the client initialization fails.
    pub fn new(cfg: RagConfig) -> Result<Self, RagError> {
        trace!("RagStore::new collection={}", cfg.collection);
        let client = qdrant_facade::QdrantFacade::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    /// Indexes every FAQ question and variation.
    ///
    /// # Errors
    /// Returns embedding, vector size mismatch or Qdrant failures.
    pub async fn index_faqs(
        &self,
        entries: &[FaqEntry],
        provider: &dyn EmbeddingsProvider,
        recreate: bool,
    ) -> Result<u64, RagError> {
        let items = ingest::faq_items(entries);
        debug!(
            "RagStore::index_faqs entries={} items={}",
            entries.len(),
            items.len()
        );
        ingest::ingest_items(&self.client, &self.cfg, &items, provider, recreate).await
    }

    /// Indexes every document chunk by its augmented content.
    ///
    /// # Errors
    /// Returns embedding, vector size mismatch or Qdrant failures.
    pub async fn index_documents(
        &self,
        chunks: &[DocumentChunk],
        provider: &dyn EmbeddingsProvider,
        recreate: bool,
    ) -> Result<u64, RagError> {
        let items = ingest::document_items(chunks);
        debug!("RagStore::index_documents chunks={}", chunks.len());
        ingest::ingest_items(&self.client, &self.cfg, &items, provider, recreate).await
    }
}
