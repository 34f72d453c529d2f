use serde::{Deserialize, Serialize};
use urag_engine::{QueryResult, Tier};

/// Request payload for `POST /query`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Natural language question.
    pub question: String,
    /// Opaque client conversation id; echoed in logs only.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Response payload for `POST /query`.
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub response: String,
    #[serde(rename = "type")]
    pub tier: Tier,
    pub confidence: f32,
    pub sources: Vec<String>,
    pub faq_id: Option<String>,
    pub document_ids: Vec<String>,
    pub matched_question: Option<String>,
}

impl From<QueryResult> for QueryResponse {
    fn from(r: QueryResult) -> Self {
        Self {
            response: r.content,
            tier: r.tier,
            confidence: r.confidence,
            sources: r.sources,
            faq_id: r.faq_id,
            document_ids: r.document_ids,
            matched_question: r.matched_question,
        }
    }
}
