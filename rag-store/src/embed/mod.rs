//! Embedding abstraction.
//!
//! Async is required because real providers (Ollama, OpenAI, etc.)
//! perform HTTP requests.

use crate::errors::RagError;
use std::{future::Future, pin::Pin};

/// Provider interface for embedding generation.
///
/// Implement this trait to plug in another embedding backend, or a
/// deterministic in-memory one for tests.
pub trait EmbeddingsProvider: Send + Sync {
    /// Maps `text` to a fixed-length vector.
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, RagError>> + Send + 'a>>;
}

pub mod service_embedder;
