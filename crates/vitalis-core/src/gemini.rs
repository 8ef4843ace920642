//! Gemini text generation backend
//!
//! Calls the `generateContent` endpoint of the Gemini API with a single user
//! prompt and returns the text of the first candidate.
//!
//! The API key comes from `assist.api_key` in config.yaml or from the
//! `GEMINI_API_KEY` environment variable.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error};

use crate::assist::{AssistError, TextGenerator};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GenerateRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

/// Text generator backed by the Gemini API
#[derive(Clone)]
pub struct GeminiGenerator {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiGenerator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at another API root (a proxy, or a local server in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Concatenated text parts of the first candidate
fn extract_text(response: &GenerateResponse) -> Result<String, AssistError> {
    if let Some(ref err) = response.error {
        return Err(AssistError::Unavailable(err.message.clone()));
    }

    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AssistError::EmptyResponse);
    }
    Ok(text)
}

fn map_api_error(status: u16, body: &str) -> AssistError {
    let message = serde_json::from_str::<GenerateResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map_or_else(|| body.trim().to_string(), |e| e.message);

    AssistError::Unavailable(format!("Gemini API error ({}): {}", status, message))
}

impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AssistError> {
        let request = GenerateRequest::from_prompt(prompt);
        debug!(model = %self.model, "Sending request to Gemini API");

        let response = self
            .client
            .post(self.build_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistError::Unavailable(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AssistError::Unavailable(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(map_api_error(status.as_u16(), &body));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| AssistError::Unavailable(format!("Failed to parse response: {}", e)))?;
        extract_text(&parsed)
    }
}
