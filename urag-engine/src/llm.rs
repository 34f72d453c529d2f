//! Generation provider seam and its adapter over `ai-llm-service`.

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use ai_llm_service::LlmServiceProfiles;
use tracing::{debug, instrument, warn};

use crate::error::EngineError;

/// Produces free text for a prompt. May fail or hang.
pub trait GenerationProvider: Send + Sync {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, EngineError>> + Send + 'a>>;
}

/// Generates through the **generation** profile of [`LlmServiceProfiles`].
#[derive(Clone, Debug)]
pub struct ServiceGenerator {
    svc: Arc<LlmServiceProfiles>,
}

impl ServiceGenerator {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl GenerationProvider for ServiceGenerator {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, EngineError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.svc.generate(prompt, None).await?) })
    }
}

/// Runs one generation call, turning expiry of `timeout` into [`EngineError::Timeout`].
#[instrument(skip_all, fields(prompt_len = prompt.len(), timeout_ms = timeout.as_millis() as u64))]
pub async fn generate_with_timeout(
    provider: &dyn GenerationProvider,
    prompt: &str,
    timeout: Duration,
) -> Result<String, EngineError> {
    match tokio::time::timeout(timeout, provider.generate(prompt)).await {
        Ok(Ok(text)) => {
            debug!(chars = text.len(), "generation done");
            Ok(text)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "generation failed");
            Err(e)
        }
        Err(_) => {
            warn!("generation timed out");
            Err(EngineError::Timeout(timeout))
        }
    }
}
