//! Prompt builders and fixed response texts.

/// Appended to every fallback answer.
pub const DISCLAIMER: &str = "\n\n*Disclaimer: This is a general response. Please verify with official college sources for the most current and accurate information.*";

/// Returned when the fallback generation itself fails.
pub const APOLOGY: &str = "I apologize, but I'm unable to process your question right now. Please contact the admissions office directly for assistance.";

/// Fixed confidence of a generated fallback answer.
pub const FALLBACK_CONFIDENCE: f32 = 0.30;

/// Fixed confidence of the apology.
pub const APOLOGY_CONFIDENCE: f32 = 0.10;

const GROUNDED_INSTRUCTION: &str = "You are a helpful college admission assistant. Answer the student's question based on the provided context. Be specific, accurate, and helpful. If the context doesn't contain enough information, say so.";

const FALLBACK_INSTRUCTION: &str = "You are a college admission assistant. Provide a helpful general response to this question. Always end with a disclaimer to verify information with official sources.";

/// Grounded prompt: instruction, chunks joined by a blank line, then the question.
///
/// # Example
/// ```
/// # use urag_engine::prompt::build_document_prompt;
/// let p = build_document_prompt("When are fees due?", &["Fees are due in July."]);
/// assert!(p.contains("Context: Fees are due in July."));
/// assert!(p.ends_with("Answer:"));
/// ```
pub fn build_document_prompt(question: &str, contexts: &[&str]) -> String {
    format!(
        "{GROUNDED_INSTRUCTION}\n\nContext: {}\n\nQuestion: {question}\n\nAnswer:",
        contexts.join("\n\n")
    )
}

/// Ungrounded prompt built from the question alone.
pub fn build_fallback_prompt(question: &str) -> String {
    format!("{FALLBACK_INSTRUCTION}\n\nQuestion: {question}\n\nResponse:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_prompt_joins_chunks_with_blank_line() {
        let p = build_document_prompt("Q?", &["first", "second"]);
        assert!(p.contains("Context: first\n\nsecond\n\nQuestion: Q?"));
    }

    #[test]
    fn fallback_prompt_has_no_context() {
        let p = build_fallback_prompt("Is there a hostel?");
        assert!(!p.contains("Context:"));
        assert!(p.ends_with("Question: Is there a hostel?\n\nResponse:"));
    }
}
