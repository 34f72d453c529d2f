//! POST /query — answers a question through the tiered engine.

use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::{debug, info};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::query::query_request::{QueryRequest, QueryResponse},
};

/// Handler: POST /query
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/query \
///   -H 'content-type: application/json' \
///   -d '{"question":"What are the admission requirements?"}'
/// ```
pub async fn query(
    State(state): State<Arc<AppState>>,
    Json(body): Json<QueryRequest>,
) -> AppResult<Json<QueryResponse>> {
    if body.question.trim().is_empty() {
        return Err(AppError::bad_field("question", "question must not be empty"));
    }

    debug!(
        conversation_id = body.conversation_id.as_deref().unwrap_or("-"),
        chars = body.question.len(),
        "query: start"
    );

    let result = state.service.answer(&body.question).await?;

    info!(
        conversation_id = body.conversation_id.as_deref().unwrap_or("-"),
        tier = %result.tier,
        confidence = result.confidence,
        "query: answered"
    );
    Ok(Json(result.into()))
}
