use std::fmt;

use serde::Serialize;

use crate::error_handler::ConfigError;

/// Backend used for generation or embedding calls.
///
/// Selected through `LLM_KIND`; see [`LlmProvider::parse_kind`].
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// assert_eq!(LlmProvider::parse_kind("Ollama").unwrap(), LlmProvider::Ollama);
/// assert_eq!(LlmProvider::parse_kind("openai").unwrap(), LlmProvider::OpenAI);
/// assert!(LlmProvider::parse_kind("huggingface").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LlmProvider {
    /// Local or self-hosted Ollama runtime.
    Ollama,
    /// OpenAI API or any server speaking the same REST dialect.
    OpenAI,
}

impl LlmProvider {
    /// Parses a case-insensitive provider name.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnsupportedProvider`] for unknown names.
    pub fn parse_kind(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::Ollama => f.write_str("Ollama"),
            LlmProvider::OpenAI => f.write_str("OpenAI"),
        }
    }
}
