//! GET /stats — index statistics.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::{core::app_state::AppState, error_handler::AppResult};

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub faq_count: u64,
    pub document_count: u64,
    pub total_variations: u64,
    pub framework_status: &'static str,
}

pub async fn stats(State(state): State<Arc<AppState>>) -> AppResult<Json<StatsResponse>> {
    let s = state.service.stats().await?;
    Ok(Json(StatsResponse {
        faq_count: s.faq_count,
        document_count: s.document_count,
        total_variations: s.total_variations,
        framework_status: "operational",
    }))
}
