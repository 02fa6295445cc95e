//! Generation Provider Trait
//!
//! Common interface for services that turn a prompt into a project solution.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Rate limited. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("Missing API key")]
    MissingApiKey,
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
    #[error("Circuit has {} wiring violation(s); fix them before generating", .0.len())]
    CircuitInvalid(Vec<String>),
    #[error("Prompt is empty")]
    EmptyPrompt,
}

/// Information about a generation model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Provider name (e.g., "gemini")
    pub provider: String,

    /// Model name (e.g., "gemini-2.5-flash")
    pub model_name: String,

    pub temperature: f32,
}

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Whether the provider has what it needs to make a request.
    fn is_configured(&self) -> bool;

    /// Send a rendered prompt and return the raw response text.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    fn model_info(&self) -> ModelInfo;
}
