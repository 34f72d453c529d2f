//! Default LLM configs loaded strictly from environment variables.
//!
//! Two roles are resolved for the selected provider (`LLM_KIND`):
//!
//! - **Generation** → answers grounded in retrieved context and fallback answers
//! - **Embedding**  → query and corpus vectors
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`            = `ollama` (default) or `openai`
//! - `LLM_MAX_TOKENS`      = max new tokens (default 512)
//! - `LLM_TEMPERATURE`     = sampling temperature (default 0.7)
//! - `LLM_TOP_P`           = nucleus cutoff (default 0.95)
//! - `LLM_TIMEOUT_SECS`    = per-request timeout for generation (default 120)
//! - `EMBEDDING_MODEL`     = embedding model (mandatory)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = generation model (mandatory)
//!
//! OpenAI-specific:
//! - `OPENAI_URL`     = endpoint (default `https://api.openai.com`)
//! - `OPENAI_API_KEY` = API key (mandatory)
//! - `OPENAI_MODEL`   = generation model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_f32, env_opt_u32, env_opt_u64, must_env, opt_env,
        validate_http_endpoint,
    },
};

const DEFAULT_MAX_TOKENS: u32 = 512;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TOP_P: f32 = 0.95;
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 120;
const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 30;

/// Provider selected by `LLM_KIND` (defaults to Ollama).
///
/// # Errors
/// [`ConfigError::UnsupportedProvider`] for unknown names.
pub fn llm_kind() -> Result<LlmProvider, AiLlmError> {
    match opt_env("LLM_KIND") {
        Some(raw) => Ok(LlmProvider::parse_kind(&raw)?),
        None => Ok(LlmProvider::Ollama),
    }
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if both are missing
/// - [`ConfigError::InvalidNumber`] if `OLLAMA_PORT` is invalid
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Some(url) = opt_env("OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = opt_env("OLLAMA_PORT") {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Err(ConfigError::MissingVar("OLLAMA_URL or OLLAMA_PORT").into())
}

fn openai_endpoint() -> Result<String, AiLlmError> {
    let url = opt_env("OPENAI_URL").unwrap_or_else(|| "https://api.openai.com".to_string());
    validate_http_endpoint("OPENAI_URL", &url)?;
    Ok(url)
}

/// Constructs the **generation** profile for the configured provider.
///
/// # Defaults
/// - `max_tokens = 512`, `temperature = 0.7`, `top_p = 0.95`
/// - `timeout_secs = 120`
///
/// # Errors
/// Missing model/endpoint/API key variables, unparsable numbers, or
/// out-of-range sampling values.
pub fn config_generation() -> Result<LlmModelConfig, AiLlmError> {
    let provider = llm_kind()?;
    let (endpoint, model, api_key) = match provider {
        LlmProvider::Ollama => (ollama_endpoint()?, must_env("OLLAMA_MODEL")?, None),
        LlmProvider::OpenAI => (
            openai_endpoint()?,
            must_env("OPENAI_MODEL")?,
            Some(must_env("OPENAI_API_KEY")?),
        ),
    };

    let cfg = LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: Some(env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS)),
        temperature: Some(env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE)),
        top_p: Some(env_opt_f32("LLM_TOP_P")?.unwrap_or(DEFAULT_TOP_P)),
        timeout_secs: Some(
            env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_GENERATION_TIMEOUT_SECS),
        ),
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Constructs the **embedding** profile for the configured provider.
///
/// # Env
/// - `EMBEDDING_MODEL` (required)
///
/// # Defaults
/// - no sampling parameters
/// - `timeout_secs = 30`
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let provider = llm_kind()?;
    let (endpoint, api_key) = match provider {
        LlmProvider::Ollama => (ollama_endpoint()?, None),
        LlmProvider::OpenAI => (openai_endpoint()?, Some(must_env("OPENAI_API_KEY")?)),
    };

    let cfg = LlmModelConfig {
        provider,
        model: must_env("EMBEDDING_MODEL")?,
        endpoint,
        api_key,
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(DEFAULT_EMBEDDING_TIMEOUT_SECS),
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Timeout for the shared health checker (`LLM_HEALTH_TIMEOUT_SECS`).
pub fn health_timeout_secs() -> Result<Option<u64>, AiLlmError> {
    env_opt_u64("LLM_HEALTH_TIMEOUT_SECS")
}
