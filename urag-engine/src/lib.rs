//! Tiered answering engine.
//!
//! Public API: [`UragService::answer`]. A question goes through three tiers in
//! strict order and the first one whose confidence clears its threshold answers:
//!
//! 1. **FAQ**: best FAQ match with similarity ≥ `FAQ_THRESHOLD`, returned verbatim.
//! 2. **Document**: up to `DOC_LIMIT` chunks; mean similarity ≥ `DOC_THRESHOLD`
//!    yields an answer generated from those chunks.
//! 3. **Fallback**: ungrounded generation with a disclaimer, or a fixed apology
//!    when generation fails.
//!
//! Provider failures inside a tier are logged and turned into misses; callers
//! only ever see a [`QueryResult`] or [`NotReady`].

mod api_types;
mod cfg;
mod engine;
mod error;
mod service;

pub mod llm;
pub mod prompt;
pub mod scoring;
pub mod tiers;

#[cfg(test)]
mod test_support;

pub use api_types::{EngineStats, QueryResult, ServiceHealth, Tier};
pub use cfg::EngineConfig;
pub use engine::{DecisionEngine, EngineContext};
pub use error::{EngineError, NotReady};
pub use llm::{GenerationProvider, ServiceGenerator};
pub use service::{UragService, probe_embedder};
pub use tiers::{MissReason, TierOutcome};
