pub mod gemini;
pub mod openai;

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")] Http(String),
    #[error("{provider} returned status {status}: {body}")] Status { provider: &'static str, status: u16, body: String },
    #[error("parse error: {0}")] Parse(String),
    #[error("empty response")] Empty,
    #[error("no API key configured for {0}")] MissingApiKey(&'static str),
    #[error("timed out after {0:?}")] Timeout(Duration),
    #[error("Other: {0}")] Other(String),
}

/// One text-generation call.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait TextProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;
}

/// Transport failure without the request URL, which can carry an API key.
pub(crate) fn transport_error(e: reqwest::Error) -> ProviderError {
    ProviderError::Http(e.without_url().to_string())
}

/// Trim the model output and drop a wrapping Markdown code fence.
pub fn normalize_output(raw: &str) -> Result<String, ProviderError> {
    let mut text = raw.trim();
    if let Some(stripped) = text.strip_prefix("```") {
        let body = stripped.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
        text = body.trim_end().strip_suffix("```").unwrap_or(body).trim();
    }
    if text.is_empty() {
        return Err(ProviderError::Empty);
    }
    Ok(text.to_string())
}

/// Short, char-boundary-safe preview of a body for logs.
pub(crate) fn preview(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...[{} chars total]", head, count)
    }
}
