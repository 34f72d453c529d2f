//! Confidence and threshold policy shared by the tiers and the engine.

use std::cmp::Ordering;

use rag_store::RetrievalHit;

/// Absorbs rounding in an aggregated mean so one that equals its threshold
/// in decimal (e.g. the mean of 0.82 and 0.78 against 0.80) is accepted.
pub const SCORE_EPSILON: f32 = 1e-6;

/// Exact `score >= threshold` for a single similarity score.
pub fn meets_threshold(score: f32, threshold: f32) -> bool {
    score >= threshold
}

/// `mean >= threshold` for a value produced by [`mean_score`], tolerant to
/// the rounding introduced by averaging.
pub fn mean_meets_threshold(mean: f32, threshold: f32) -> bool {
    mean + SCORE_EPSILON >= threshold
}

/// Arithmetic mean of hit scores (accumulated in f64), `None` for no hits.
pub fn mean_score(hits: &[RetrievalHit]) -> Option<f32> {
    if hits.is_empty() {
        return None;
    }
    let sum: f64 = hits.iter().map(|h| f64::from(h.score)).sum();
    Some((sum / hits.len() as f64) as f32)
}

/// Sorts hits by descending score; equal scores go by ascending `ordinal`
/// (first indexed wins). Hits without an ordinal rank after those with one
/// and keep their relative order.
pub fn rank_hits(mut hits: Vec<RetrievalHit>) -> Vec<RetrievalHit> {
    hits.sort_by(|a, b| match b.score.total_cmp(&a.score) {
        Ordering::Equal => ordinal_key(a).cmp(&ordinal_key(b)),
        other => other,
    });
    hits
}

fn ordinal_key(h: &RetrievalHit) -> u64 {
    h.ordinal().unwrap_or(u64::MAX)
}

/// Keeps the first occurrence of each value, preserving order.
pub fn distinct_in_order<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|seen| seen == v) {
            out.push(v.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_store::fields;
    use serde_json::{Map, json};

    fn hit(id: &str, score: f32, ordinal: Option<u64>) -> RetrievalHit {
        let mut metadata = Map::new();
        if let Some(o) = ordinal {
            metadata.insert(fields::ORDINAL.into(), json!(o));
        }
        RetrievalHit {
            item_id: id.into(),
            score,
            metadata,
        }
    }

    #[test]
    fn boundary_mean_is_accepted() {
        let mean = mean_score(&[hit("a", 0.82, None), hit("b", 0.78, None)]).unwrap();
        assert!((mean - 0.80).abs() < SCORE_EPSILON);
        assert!(mean_meets_threshold(mean, 0.80));
    }

    #[test]
    fn clearly_below_mean_is_rejected() {
        let mean = mean_score(&[hit("a", 0.80, None), hit("b", 0.78, None)]).unwrap();
        assert!(!mean_meets_threshold(mean, 0.80));
    }

    #[test]
    fn single_scores_compare_exactly() {
        assert!(meets_threshold(0.90, 0.90));
        assert!(!meets_threshold(0.8999995, 0.90));
        assert!(!meets_threshold(0.8999, 0.90));
    }

    #[test]
    fn empty_mean_is_none() {
        assert_eq!(mean_score(&[]), None);
    }

    #[test]
    fn ties_prefer_first_indexed() {
        let ranked = rank_hits(vec![
            hit("later", 0.95, Some(7)),
            hit("best", 0.97, Some(9)),
            hit("first", 0.95, Some(2)),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|h| h.item_id.as_str()).collect();
        assert_eq!(ids, ["best", "first", "later"]);
    }

    #[test]
    fn hits_without_ordinal_keep_returned_order() {
        let ranked = rank_hits(vec![
            hit("x", 0.9, None),
            hit("y", 0.9, None),
            hit("z", 0.9, Some(0)),
        ]);
        let ids: Vec<&str> = ranked.iter().map(|h| h.item_id.as_str()).collect();
        assert_eq!(ids, ["z", "x", "y"]);
    }

    #[test]
    fn distinct_keeps_first_occurrence() {
        let urls = distinct_in_order(["u1", "u2", "u1", "u3", "u2"]);
        assert_eq!(urls, ["u1", "u2", "u3"]);
    }
}
