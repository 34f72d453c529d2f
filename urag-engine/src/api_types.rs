//! Public API types re-used by external crates (e.g., the HTTP API layer).

use std::fmt;

use serde::Serialize;

/// Which strategy produced an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Faq,
    Document,
    Fallback,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tier::Faq => "faq",
            Tier::Document => "document",
            Tier::Fallback => "fallback",
        })
    }
}

/// The engine's answer to one question. Built once, never mutated.
///
/// # Example
/// ```
/// use urag_engine::{QueryResult, Tier};
/// let r = QueryResult::fallback("Please contact the office.".into(), 0.10);
/// assert_eq!(r.tier, Tier::Fallback);
/// assert!(r.sources.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QueryResult {
    pub tier: Tier,
    pub content: String,
    /// In `[0, 1]`.
    pub confidence: f32,
    /// Distinct source URLs, in rank order.
    pub sources: Vec<String>,
    pub faq_id: Option<String>,
    /// Chunk ids in retrieval rank order.
    pub document_ids: Vec<String>,
    pub matched_question: Option<String>,
}

impl QueryResult {
    pub fn fallback(content: String, confidence: f32) -> Self {
        Self {
            tier: Tier::Fallback,
            content,
            confidence,
            sources: Vec::new(),
            faq_id: None,
            document_ids: Vec::new(),
            matched_question: None,
        }
    }
}

/// Index statistics, computed on demand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub faq_count: u64,
    pub document_count: u64,
    pub total_variations: u64,
}

/// Readiness snapshot of the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ServiceHealth {
    pub ready: bool,
    pub faq_index_loaded: bool,
    pub document_index_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
