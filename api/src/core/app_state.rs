use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use urag_engine::UragService;

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// The answering service (ready or degraded).
    pub service: UragService,
    /// LLM profiles for `/health`; `None` when they could not be configured.
    pub llm: Option<Arc<LlmServiceProfiles>>,
}

impl AppState {
    pub fn new(service: UragService, llm: Option<Arc<LlmServiceProfiles>>) -> Self {
        Self { service, llm }
    }
}
