//! Typed errors for the engine crate.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid engine configuration.
    #[error("engine config error: {0}")]
    Config(String),

    /// Errors from the underlying rag-store crate (embedding, index, artifacts).
    #[error("RAG error: {0}")]
    Rag(#[from] rag_store::RagError),

    /// Errors from the LLM service (generation provider).
    #[error("LLM error: {0}")]
    Llm(#[from] ai_llm_service::AiLlmError),

    /// Generation did not finish in time.
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The engine failed to initialize; queries are refused until restart.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("service not ready: {reason}")]
pub struct NotReady {
    pub reason: String,
}
