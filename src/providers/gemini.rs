use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use super::{normalize_output, preview, transport_error, GenerationRequest, ProviderError, TextProvider};
use crate::config::{ProviderConfig, DEFAULT_GEMINI_BASE, DEFAULT_GEMINI_MODEL};

/// Single-prompt generation client for the Gemini `generateContent` API.
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    fn endpoint(&self, api_key: &str) -> String {
        format!("{}/models/{}:generateContent?key={}", self.base_url, self.model, api_key)
    }

    fn payload(request: &GenerationRequest) -> serde_json::Value {
        json!({
            "systemInstruction": {
                "parts": [{"text": request.system}]
            },
            "contents": [{
                "role": "user",
                "parts": [{"text": request.prompt}]
            }],
            "generationConfig": {
                "temperature": request.temperature,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": request.max_tokens
            }
        })
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new(&ProviderConfig {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
        })
    }
}

#[async_trait]
impl TextProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey("gemini"))?;
        let url = self.endpoint(api_key);
        info!("🔗 Gemini request to: {}", url.replace(api_key, "***"));

        let response = self.client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&Self::payload(request))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let response_text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            error!("❌ Gemini text generation failed with status {}: {}", status, preview(&response_text, 300));
            return Err(ProviderError::Status { provider: "gemini", status: status.as_u16(), body: response_text });
        }
        info!("📥 Gemini response ({} chars): {}", response_text.len(), preview(&response_text, 200));

        let parsed: GeminiResponse = serde_json::from_str(&response_text)
            .map_err(|e| ProviderError::Parse(format!("Failed to parse Gemini response: {}", e)))?;
        normalize_output(&extract_text(&parsed).ok_or(ProviderError::Empty)?)
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate { #[serde(default)] content: Content }

#[derive(Debug, Deserialize, Default)]
struct Content { #[serde(default)] parts: Vec<Part> }

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Other(serde_json::Value),
}

/// Concatenated text parts of the first candidate that has any.
fn extract_text(resp: &GeminiResponse) -> Option<String> {
    resp.candidates.iter().find_map(|c| {
        let texts: Vec<&str> = c.content.parts.iter().filter_map(|p| match p {
            Part::Text { text } => Some(text.as_str()),
            Part::Other(_) => None,
        }).collect();
        (!texts.is_empty()).then(|| texts.concat())
    })
}
