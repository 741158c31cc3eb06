//! Gemini API client (research gateway)
//!
//! Used both for open-ended research over the conversation context and for
//! folding evicted turns into long-term memory.
//! Uses a long-lived reqwest::Client for connection pooling.

use crate::config::ProviderConfig;
use crate::error::GatewayError;
use crate::gateway::ModelGateway;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: ProviderConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key,
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ModelGateway for GeminiClient {
    fn provider(&self) -> &'static str {
        "Gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        if self.api_key.is_empty() {
            return Err(GatewayError::MissingApiKey { provider: "Gemini" });
        }

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        info!(model = %self.model, "Calling Gemini API");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("Gemini API request failed: {}", e);
                GatewayError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API error response: {}", body);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to parse Gemini response: {}", e);
            GatewayError::Decode(e.to_string())
        })?;

        let answer = gemini_response.into_text().ok_or(GatewayError::EmptyResponse)?;

        info!("Gemini response received ({} chars)", answer.len());

        Ok(answer)
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
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
    /// Concatenated text parts of the first candidate
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
