use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub framework: &'static str,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "College Admission Assistant API",
        status: "running",
        framework: "U-RAG",
    })
}
