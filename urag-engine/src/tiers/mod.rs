//! The three answering tiers. Each sees the original query string and
//! reports a [`TierOutcome`]; only the engine decides what is returned.

pub mod document;
pub mod fallback;
pub mod faq;

use std::fmt;

use crate::api_types::QueryResult;

/// Result of one tier attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum TierOutcome {
    Hit(QueryResult),
    Miss(MissReason),
}

/// Why a tier produced nothing. None of these reach the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum MissReason {
    /// The index returned no usable candidates.
    NoCandidates,
    /// Best FAQ score under the threshold.
    BelowThreshold { confidence: f32, threshold: f32 },
    /// A stored item lacks a field the tier needs.
    MalformedHit(String),
    /// Embedding, index or generation call failed or timed out.
    ProviderFailure(String),
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissReason::NoCandidates => f.write_str("no candidates"),
            MissReason::BelowThreshold {
                confidence,
                threshold,
            } => write!(f, "confidence {confidence:.4} below {threshold:.2}"),
            MissReason::MalformedHit(m) => write!(f, "malformed hit: {m}"),
            MissReason::ProviderFailure(m) => write!(f, "provider failure: {m}"),
        }
    }
}
