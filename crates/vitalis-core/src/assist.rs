//! Boundary to the external text generation service
//!
//! The service is opaque: it takes a prompt and eventually returns text or
//! fails. Callers never see the failure, they get a static fallback instead.

use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::AssistConfig;
use crate::gemini::{GeminiGenerator, API_KEY_ENV};

/// Errors reported by a generation backend
#[derive(Error, Debug)]
pub enum AssistError {
    #[error("Generation service is not configured")]
    NotConfigured,

    #[error("Generation service unavailable: {0}")]
    Unavailable(String),

    #[error("Generation service returned an empty response")]
    EmptyResponse,
}

/// A backend that turns a prompt into text
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, AssistError>> + Send;
}

/// Backend used when no generation service is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl TextGenerator for Unconfigured {
    async fn generate(&self, _prompt: &str) -> Result<String, AssistError> {
        Err(AssistError::NotConfigured)
    }
}

/// The generator the tools use, picked from configuration
#[derive(Debug, Clone)]
pub enum Assistant {
    Gemini(GeminiGenerator),
    Unconfigured(Unconfigured),
}

impl Assistant {
    /// Gemini when an API key is configured or set in `GEMINI_API_KEY`
    pub fn from_config(config: &AssistConfig) -> Self {
        Self::select(config, std::env::var(API_KEY_ENV).ok())
    }

    /// Pick a backend; the key in config.yaml wins over `env_key`
    pub fn select(config: &AssistConfig, env_key: Option<String>) -> Self {
        let key = config
            .api_key
            .clone()
            .or(env_key)
            .filter(|k| !k.trim().is_empty());

        match key {
            Some(key) => Self::Gemini(
                GeminiGenerator::new(key)
                    .with_model(config.model.clone())
                    .with_base_url(config.endpoint.clone()),
            ),
            None => {
                debug!("No generation API key configured");
                Self::Unconfigured(Unconfigured)
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Gemini(_))
    }
}

impl TextGenerator for Assistant {
    async fn generate(&self, prompt: &str) -> Result<String, AssistError> {
        match self {
            Self::Gemini(g) => g.generate(prompt).await,
            Self::Unconfigured(u) => u.generate(prompt).await,
        }
    }
}

/// Generate text, substituting `fallback` on any failure
pub async fn generate_or_fallback<G>(generator: &G, prompt: &str, fallback: &str) -> String
where
    G: TextGenerator + Sync,
{
    debug!("Requesting generation ({} chars)", prompt.len());
    match generator.generate(prompt).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("Generation failed: {}", AssistError::EmptyResponse);
            fallback.to_string()
        }
        Err(e) => {
            warn!("Generation failed: {}", e);
            fallback.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl TextGenerator for Echo {
        async fn generate(&self, prompt: &str) -> Result<String, AssistError> {
            Ok(format!("echo: {}", prompt))
        }
    }

    struct Blank;

    impl TextGenerator for Blank {
        async fn generate(&self, _prompt: &str) -> Result<String, AssistError> {
            Ok("   ".to_string())
        }
    }

    struct Down;

    impl TextGenerator for Down {
        async fn generate(&self, _prompt: &str) -> Result<String, AssistError> {
            Err(AssistError::Unavailable("503".to_string()))
        }
    }

    #[tokio::test]
    async fn test_success_passes_text_through() {
        let text = generate_or_fallback(&Echo, "hello", "fallback").await;
        assert_eq!(text, "echo: hello");
    }

    #[test]
    fn test_select_prefers_config_key() {
        let mut config = AssistConfig::default();
        assert!(!Assistant::select(&config, None).is_configured());
        assert!(!Assistant::select(&config, Some("  ".to_string())).is_configured());

        match Assistant::select(&config, Some("from-env".to_string())) {
            Assistant::Gemini(g) => assert_eq!(g.model(), crate::gemini::DEFAULT_MODEL),
            other => panic!("expected Gemini, got {:?}", other),
        }

        config.api_key = Some("from-file".to_string());
        config.model = "gemini-2.5-pro".to_string();
        match Assistant::select(&config, None) {
            Assistant::Gemini(g) => assert_eq!(g.model(), "gemini-2.5-pro"),
            other => panic!("expected Gemini, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_assistant_falls_back() {
        let assistant = Assistant::select(&AssistConfig::default(), None);
        assert_eq!(generate_or_fallback(&assistant, "hi", "later").await, "later");
    }

    #[tokio::test]
    async fn test_failures_become_fallback() {
        assert_eq!(generate_or_fallback(&Down, "hi", "later").await, "later");
        assert_eq!(generate_or_fallback(&Blank, "hi", "later").await, "later");
        assert_eq!(generate_or_fallback(&Unconfigured, "hi", "later").await, "later");
    }
}
