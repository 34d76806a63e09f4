use std::time::Duration;
use tracing::warn;

pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_GEMINI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Runtime settings read from the process environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openai: ProviderConfig,
    pub gemini: ProviderConfig,
    pub generation: GenerationSettings,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Copy)]
pub struct GenerationSettings {
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), temperature: 0.7, max_tokens: 1500 }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = GenerationSettings::default();

        let timeout_secs = parse_or(&lookup, "PROVIDER_TIMEOUT_SECS", defaults.timeout.as_secs());
        Self {
            port: parse_or(&lookup, "PORT", 8080u16),
            openai: ProviderConfig {
                api_key: non_empty("OPENAI_API_KEY"),
                base_url: non_empty("OPENAI_API_BASE").unwrap_or_else(|| DEFAULT_OPENAI_BASE.to_string()),
                model: non_empty("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            },
            gemini: ProviderConfig {
                api_key: non_empty("GEMINI_API_KEY"),
                base_url: non_empty("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_GEMINI_BASE.to_string()),
                model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            },
            generation: GenerationSettings {
                timeout: Duration::from_secs(timeout_secs.max(1)),
                temperature: parse_or(&lookup, "GENERATION_TEMPERATURE", defaults.temperature),
                max_tokens: parse_or(&lookup, "GENERATION_MAX_TOKENS", defaults.max_tokens),
            },
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("⚠️ Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}

/// Mask all but the first few characters of a secret for logging.
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    format!("{}***", visible)
}
