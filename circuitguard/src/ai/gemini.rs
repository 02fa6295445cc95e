use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::ai::provider::{GenerationError, GenerationProvider, ModelInfo};

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TEMPERATURE: f32 = 0.1;
const MAX_RETRIES: u32 = 3;
const INITIAL_RETRY_DELAY_MS: u64 = 1000;

/// Settings for one Gemini client. Constructed by the caller.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub endpoint: String,
    pub max_retries: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            endpoint: GEMINI_API_URL.to_string(),
            max_retries: MAX_RETRIES,
        }
    }
}

impl GenerationConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Read the key from `GEMINI_API_KEY`, falling back to `API_KEY`.
    pub fn from_env() -> Result<Self, GenerationError> {
        ["GEMINI_API_KEY", "API_KEY"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty())
            .map(Self::new)
            .ok_or(GenerationError::MissingApiKey)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: RequestConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct RequestConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        (!text.is_empty()).then_some(text)
    }
}

pub struct GeminiClient {
    client: Client,
    config: GenerationConfig,
}

impl GeminiClient {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn send_request(&self, prompt: &str) -> Result<String, GenerationError> {
        if self.config.api_key.is_empty() {
            return Err(GenerationError::MissingApiKey);
        }

        let request_body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: RequestConfig {
                temperature: self.config.temperature,
            },
        };

        let url = self.url();
        let mut backoff = Backoff::new(self.config.max_retries);

        loop {
            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.config.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let wait = match response {
                Ok(resp) if resp.status().is_success() => return read_text(resp).await,
                Ok(resp) if resp.status() == StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = retry_after_secs(resp.headers())
                        .unwrap_or_else(|| backoff.delay().as_secs());
                    if !backoff.advance() {
                        return Err(GenerationError::RateLimited { retry_after });
                    }
                    tracing::warn!(
                        model = %self.config.model,
                        attempt = backoff.attempt(),
                        "Gemini rate limit hit, waiting {}s",
                        retry_after
                    );
                    Duration::from_secs(retry_after)
                }
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    let message = resp
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    return Err(GenerationError::ApiError { status, message });
                }
                Err(e) => {
                    let wait = backoff.delay();
                    if !backoff.advance() {
                        return Err(GenerationError::RequestFailed(e));
                    }
                    tracing::warn!(
                        model = %self.config.model,
                        attempt = backoff.attempt(),
                        "Gemini request failed ({}), waiting {:?}",
                        e,
                        wait
                    );
                    wait
                }
            };
            sleep(wait).await;
        }
    }
}

async fn read_text(resp: reqwest::Response) -> Result<String, GenerationError> {
    let body: GeminiResponse = resp
        .json()
        .await
        .map_err(|e| GenerationError::InvalidResponse(format!("Failed to parse JSON: {}", e)))?;
    body.text()
        .ok_or_else(|| GenerationError::InvalidResponse("No text in response candidates".to_string()))
}

/// Seconds from a `retry-after` header, when it holds a plain integer.
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

/// Doubling delay with a bounded number of retries.
#[derive(Debug)]
struct Backoff {
    attempt: u32,
    max_retries: u32,
    delay_ms: u64,
}

impl Backoff {
    fn new(max_retries: u32) -> Self {
        Self {
            attempt: 0,
            max_retries,
            delay_ms: INITIAL_RETRY_DELAY_MS,
        }
    }

    fn attempt(&self) -> u32 {
        self.attempt
    }

    fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Consume one retry. `false` once the budget is spent.
    fn advance(&mut self) -> bool {
        if self.attempt >= self.max_retries {
            return false;
        }
        self.attempt += 1;
        self.delay_ms = self.delay_ms.saturating_mul(2);
        true
    }
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        tracing::info!("Requesting solution from {}", self.config.model);
        self.send_request(prompt).await
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "gemini".to_string(),
            model_name: self.config.model.clone(),
            temperature: self.config.temperature,
        }
    }
}
