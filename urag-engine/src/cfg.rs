//! Runtime configuration loaded from environment variables.

use std::{path::PathBuf, str::FromStr, time::Duration};

use crate::error::EngineError;

/// Gating knobs and artifact paths. All fields have defaults via [`Default`].
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Minimum FAQ similarity for a verbatim answer.
    pub faq_threshold: f32,
    /// Minimum mean chunk similarity for a grounded answer.
    pub doc_threshold: f32,
    /// Per-chunk similarity required to enter the grounded prompt.
    pub doc_chunk_threshold: f32,
    pub faq_limit: u64,
    pub doc_limit: u64,
    /// Applied around every generation call.
    pub generation_timeout: Duration,

    pub faq_records_file: PathBuf,
    pub augmented_docs_file: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            faq_threshold: 0.90,
            doc_threshold: 0.80,
            doc_chunk_threshold: 0.80,
            faq_limit: 20,
            doc_limit: 2,
            generation_timeout: Duration::from_secs(60),
            faq_records_file: PathBuf::from("data/enriched_faqs.json"),
            augmented_docs_file: PathBuf::from("data/augmented_docs.json"),
        }
    }
}

impl EngineConfig {
    /// Build from environment variables; unset ones keep their defaults.
    ///
    /// `DOC_CHUNK_THRESHOLD` defaults to the effective `DOC_THRESHOLD`.
    ///
    /// # Errors
    /// [`EngineError::Config`] if a variable is set but malformed, or the
    /// result fails [`EngineConfig::validate`].
    ///
    /// # Example
    /// ```no_run
    /// # use urag_engine::EngineConfig;
    /// let cfg = EngineConfig::from_env().unwrap();
    /// assert!(cfg.faq_threshold >= cfg.doc_threshold);
    /// ```
    pub fn from_env() -> Result<Self, EngineError> {
        let d = Self::default();

        let doc_threshold = parse("DOC_THRESHOLD")?.unwrap_or(d.doc_threshold);
        let cfg = Self {
            faq_threshold: parse("FAQ_THRESHOLD")?.unwrap_or(d.faq_threshold),
            doc_threshold,
            doc_chunk_threshold: parse("DOC_CHUNK_THRESHOLD")?.unwrap_or(doc_threshold),
            faq_limit: parse("FAQ_LIMIT")?.unwrap_or(d.faq_limit),
            doc_limit: parse("DOC_LIMIT")?.unwrap_or(d.doc_limit),
            generation_timeout: parse::<u64>("GENERATION_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(d.generation_timeout),
            faq_records_file: parse("FAQ_RECORDS_FILE")?.unwrap_or(d.faq_records_file),
            augmented_docs_file: parse("AUGMENTED_DOCS_FILE")?.unwrap_or(d.augmented_docs_file),
        };

        cfg.validate()?;
        Ok(cfg)
    }

    /// Thresholds in `[0, 1]`, positive limits and timeout.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, v) in [
            ("FAQ_THRESHOLD", self.faq_threshold),
            ("DOC_THRESHOLD", self.doc_threshold),
            ("DOC_CHUNK_THRESHOLD", self.doc_chunk_threshold),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(EngineError::Config(format!("{name} must be in [0, 1], got {v}")));
            }
        }
        if self.faq_limit == 0 || self.doc_limit == 0 {
            return Err(EngineError::Config("FAQ_LIMIT and DOC_LIMIT must be > 0".into()));
        }
        if self.generation_timeout.is_zero() {
            return Err(EngineError::Config("GENERATION_TIMEOUT_SECS must be > 0".into()));
        }
        Ok(())
    }
}

fn parse<T: FromStr>(k: &str) -> Result<Option<T>, EngineError> {
    match std::env::var(k) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| EngineError::Config(format!("{k} has an invalid value: {v:?}"))),
        _ => Ok(None),
    }
}
