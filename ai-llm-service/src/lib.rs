//! Shared LLM access for the answering service.
//!
//! Two logical profiles are exposed through [`service_profiles::LlmServiceProfiles`]:
//! a **generation** model (grounded and fallback answers) and an **embedding**
//! model (query and corpus vectors). Providers are selected by configuration
//! (`LLM_KIND`) and share one error type, [`error_handler::AiLlmError`].

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::AiLlmError;
pub use health_service::HealthStatus;
pub use service_profiles::LlmServiceProfiles;
