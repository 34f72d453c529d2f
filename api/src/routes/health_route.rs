//! GET /health — engine readiness plus LLM provider probes.

use std::sync::Arc;

use ai_llm_service::HealthStatus;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::warn;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub urag_engine: &'static str,
    pub vector_stores: VectorStores,
    pub llm: Vec<HealthStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VectorStores {
    pub faq: &'static str,
    pub documents: &'static str,
}

fn loaded(flag: bool) -> &'static str {
    if flag { "loaded" } else { "not_loaded" }
}

/// 200 when the engine is ready, 503 otherwise; the body is the same shape.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let h = state.service.health();

    let llm = match &state.llm {
        Some(svc) => svc.health_all().await,
        None => Vec::new(),
    };
    if let Some(bad) = llm.iter().find(|s| !s.ok) {
        warn!(provider = %bad.provider, message = %bad.message, "LLM probe failed");
    }

    let status = if h.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if h.ready { "healthy" } else { "unhealthy" },
            urag_engine: if h.ready { "initialized" } else { "not_initialized" },
            vector_stores: VectorStores {
                faq: loaded(h.faq_index_loaded),
                documents: loaded(h.document_index_loaded),
            },
            llm,
            reason: h.reason,
        }),
    )
}
