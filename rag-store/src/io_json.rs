//! Readers for the persisted preparation artifacts.
//!
//! - [`load_faq_entries`] → FAQ records file (JSON array of [`FaqEntry`])
//! - [`load_document_chunks`] → Augmented Documents file (JSON array of [`DocumentChunk`])
//!
//! Both readers are strict: a record that breaks an invariant fails the load.

use std::collections::HashSet;
use std::{fs::File, io::BufReader, path::Path};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::errors::RagError;
use crate::record::{DocumentChunk, FaqEntry};

/// Reads and validates the FAQ records file.
///
/// # Errors
/// - [`RagError::Io`] if the file cannot be read.
/// - [`RagError::Parse`] if it is not a JSON array of FAQ entries.
/// - [`RagError::Invalid`] on empty/duplicate ids, empty questions or answers.
pub fn load_faq_entries(path: impl AsRef<Path>) -> Result<Vec<FaqEntry>, RagError> {
    info!("Reading FAQ records: {:?}", path.as_ref());
    let entries: Vec<FaqEntry> = read_json_array(path)?;
    validate_faq_entries(&entries)?;
    debug!(
        entries = entries.len(),
        variations = total_variations(&entries),
        "FAQ records loaded"
    );
    Ok(entries)
}

/// Reads and validates the Augmented Documents file.
///
/// # Errors
/// - [`RagError::Io`] / [`RagError::Parse`] as above.
/// - [`RagError::Invalid`] on empty/duplicate ids or empty `augmented_content`.
pub fn load_document_chunks(path: impl AsRef<Path>) -> Result<Vec<DocumentChunk>, RagError> {
    info!("Reading augmented documents: {:?}", path.as_ref());
    let chunks: Vec<DocumentChunk> = read_json_array(path)?;
    validate_document_chunks(&chunks)?;
    debug!(chunks = chunks.len(), "augmented documents loaded");
    Ok(chunks)
}

/// Sum of paraphrase counts across all FAQ entries.
pub fn total_variations(entries: &[FaqEntry]) -> usize {
    entries.iter().map(|e| e.variations.len()).sum()
}

/// Checks FAQ invariants: unique non-empty `id`, non-empty `question` and `answer`.
pub fn validate_faq_entries(entries: &[FaqEntry]) -> Result<(), RagError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for (i, e) in entries.iter().enumerate() {
        if e.id.trim().is_empty() {
            return Err(RagError::Invalid(format!("FAQ entry #{i} has an empty id")));
        }
        if !seen.insert(e.id.as_str()) {
            return Err(RagError::Invalid(format!("duplicate FAQ id {:?}", e.id)));
        }
        if e.question.trim().is_empty() {
            return Err(RagError::Invalid(format!("FAQ {:?} has an empty question", e.id)));
        }
        if e.answer.trim().is_empty() {
            return Err(RagError::Invalid(format!("FAQ {:?} has an empty answer", e.id)));
        }
    }
    Ok(())
}

/// Checks chunk invariants: unique non-empty `id`, non-empty `augmented_content`.
pub fn validate_document_chunks(chunks: &[DocumentChunk]) -> Result<(), RagError> {
    let mut seen = HashSet::with_capacity(chunks.len());
    for (i, c) in chunks.iter().enumerate() {
        if c.id.trim().is_empty() {
            return Err(RagError::Invalid(format!("document chunk #{i} has an empty id")));
        }
        if !seen.insert(c.id.as_str()) {
            return Err(RagError::Invalid(format!("duplicate document id {:?}", c.id)));
        }
        if c.augmented_content.trim().is_empty() {
            return Err(RagError::Invalid(format!(
                "document {:?} has empty augmented_content",
                c.id
            )));
        }
    }
    Ok(())
}

fn read_json_array<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>, RagError> {
    let file = File::open(path.as_ref())?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
