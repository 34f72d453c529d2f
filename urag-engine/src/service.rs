//! Readiness wrapper around the [`DecisionEngine`].
//!
//! Startup never aborts: if an index cannot be opened or the embedding
//! provider does not answer, the service is built in a degraded state and
//! every query fails fast with [`NotReady`].

use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use rag_store::{
    CollectionNames, EmbeddingsProvider, QdrantIndex, RagConfig, RagError, ServiceEmbedder,
    SimilarityIndex,
};
use tracing::{error, info, instrument};

use crate::api_types::{EngineStats, QueryResult, ServiceHealth};
use crate::cfg::EngineConfig;
use crate::engine::{DecisionEngine, EngineContext};
use crate::error::NotReady;
use crate::llm::{GenerationProvider, ServiceGenerator};

enum State {
    Ready(DecisionEngine),
    NotReady {
        reason: String,
        faq_loaded: bool,
        documents_loaded: bool,
    },
}

/// The process-wide answering service.
pub struct UragService {
    state: State,
}

impl UragService {
    /// Probes the embedding provider, opens both indexes and assembles the engine.
    ///
    /// The generation provider is not probed; its failures are handled per query.
    #[instrument(skip_all, fields(faq = %names.faq, documents = %names.documents))]
    pub async fn initialize(
        config: EngineConfig,
        rag: &RagConfig,
        names: &CollectionNames,
        llm: Arc<LlmServiceProfiles>,
    ) -> Self {
        let embedder: Arc<dyn EmbeddingsProvider> =
            Arc::new(ServiceEmbedder::new(llm.clone(), rag.embedding_dim));
        let generator: Arc<dyn GenerationProvider> = Arc::new(ServiceGenerator::new(llm));

        let dim = match probe_embedder(embedder.as_ref()).await {
            Ok(d) => d,
            Err(e) => {
                let reason = format!("embedding provider unavailable: {e}");
                error!(%reason, "engine initialization failed");
                return Self::degraded(reason, false, false);
            }
        };
        let expected = rag.embedding_dim.or(Some(dim));

        let faq = open_index(&rag.with_collection(&names.faq), expected).await;
        let docs = open_index(&rag.with_collection(&names.documents), expected).await;

        Self::assemble(config, embedder, generator, faq, docs)
    }

    /// Builds a ready service when both indexes opened, a degraded one otherwise.
    pub fn assemble(
        config: EngineConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
        generator: Arc<dyn GenerationProvider>,
        faq: Result<Arc<dyn SimilarityIndex>, RagError>,
        documents: Result<Arc<dyn SimilarityIndex>, RagError>,
    ) -> Self {
        match (faq, documents) {
            (Ok(faq_index), Ok(document_index)) => {
                info!("engine ready");
                Self::from_engine(DecisionEngine::new(EngineContext::new(
                    config,
                    embedder,
                    faq_index,
                    document_index,
                    generator,
                )))
            }
            (faq, docs) => {
                let reason = [
                    faq.as_ref().err().map(|e| format!("FAQ index: {e}")),
                    docs.as_ref().err().map(|e| format!("document index: {e}")),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join("; ");
                error!(%reason, "engine initialization failed");
                Self::degraded(reason, faq.is_ok(), docs.is_ok())
            }
        }
    }

    pub fn from_engine(engine: DecisionEngine) -> Self {
        Self {
            state: State::Ready(engine),
        }
    }

    pub fn degraded(reason: impl Into<String>, faq_loaded: bool, documents_loaded: bool) -> Self {
        Self {
            state: State::NotReady {
                reason: reason.into(),
                faq_loaded,
                documents_loaded,
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    /// # Errors
    /// [`NotReady`] when the service started degraded.
    pub async fn answer(&self, question: &str) -> Result<QueryResult, NotReady> {
        Ok(self.engine()?.answer(question).await)
    }

    /// # Errors
    /// [`NotReady`] when the service started degraded.
    pub async fn stats(&self) -> Result<EngineStats, NotReady> {
        Ok(self.engine()?.stats().await)
    }

    pub fn health(&self) -> ServiceHealth {
        match &self.state {
            State::Ready(_) => ServiceHealth {
                ready: true,
                faq_index_loaded: true,
                document_index_loaded: true,
                reason: None,
            },
            State::NotReady {
                reason,
                faq_loaded,
                documents_loaded,
            } => ServiceHealth {
                ready: false,
                faq_index_loaded: *faq_loaded,
                document_index_loaded: *documents_loaded,
                reason: Some(reason.clone()),
            },
        }
    }

    fn engine(&self) -> Result<&DecisionEngine, NotReady> {
        match &self.state {
            State::Ready(e) => Ok(e),
            State::NotReady { reason, .. } => Err(NotReady {
                reason: reason.clone(),
            }),
        }
    }
}

/// Embeds a fixed text and returns the vector size.
pub async fn probe_embedder(embedder: &dyn EmbeddingsProvider) -> Result<usize, RagError> {
    let v = embedder.embed("readiness probe").await?;
    if v.is_empty() {
        return Err(RagError::Embedding("probe returned an empty vector".into()));
    }
    Ok(v.len())
}

async fn open_index(
    cfg: &RagConfig,
    expected_dim: Option<usize>,
) -> Result<Arc<dyn SimilarityIndex>, RagError> {
    let index = QdrantIndex::open(cfg, expected_dim).await?;
    Ok(Arc::new(index))
}
