use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use super::{normalize_output, preview, transport_error, GenerationRequest, ProviderError, TextProvider};
use crate::config::{ProviderConfig, DEFAULT_OPENAI_BASE, DEFAULT_OPENAI_MODEL};

/// Chat-completion client for OpenAI-compatible endpoints.
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiClient {
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

    fn payload(&self, request: &GenerationRequest) -> serde_json::Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.prompt}
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens
        })
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new(&ProviderConfig {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
        })
    }
}

#[async_trait]
impl TextProvider for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey("openai"))?;
        let url = format!("{}/chat/completions", self.base_url);
        info!("🔗 OpenAI request to: {} (model {})", url, self.model);

        let response = self.client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.payload(request))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let response_text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            error!("❌ OpenAI completion failed with status {}: {}", status, preview(&response_text, 300));
            return Err(ProviderError::Status { provider: "openai", status: status.as_u16(), body: response_text });
        }
        info!("📥 OpenAI response ({} chars): {}", response_text.len(), preview(&response_text, 200));

        let parsed: ChatCompletion = serde_json::from_str(&response_text)
            .map_err(|e| ProviderError::Parse(format!("Failed to parse OpenAI response: {}", e)))?;
        let content = parsed
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or(ProviderError::Empty)?;
        normalize_output(&content)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice { message: Message }

#[derive(Debug, Deserialize)]
struct Message { #[serde(default)] content: Option<String> }
