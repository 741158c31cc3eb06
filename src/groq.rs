//! Groq API client (synthesis gateway)
//!
//! Talks to Groq's OpenAI-compatible chat completions endpoint and produces
//! the user-facing answer from the research notes.

use crate::config::ProviderConfig;
use crate::error::GatewayError;
use crate::gateway::ModelGateway;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub struct GroqClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqClient {
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
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl ModelGateway for GroqClient {
    fn provider(&self) -> &'static str {
        "Groq"
    }

    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        if self.api_key.is_empty() {
            return Err(GatewayError::MissingApiKey { provider: "Groq" });
        }

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        info!(model = %self.model, "Calling Groq API");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("Groq API request failed: {}", e);
                GatewayError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Groq API error response: {}", body);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.without_url().to_string()))?;

        data.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GatewayError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: &str) -> GroqClient {
        GroqClient::new(ProviderConfig {
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: server.uri(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_sends_single_user_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer groq-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama-3.3-70b-versatile",
                "messages": [{ "role": "user", "content": "answer me" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "Here you go" },
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, "groq-key");
        assert_eq!(client.generate("answer me").await.unwrap(), "Here you go");
    }

    #[tokio::test]
    async fn test_null_content_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": null } }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, "groq-key");
        assert!(matches!(
            client.generate("x").await,
            Err(GatewayError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let client = client_for(&server, "bad-key");
        assert!(matches!(
            client.generate("x").await,
            Err(GatewayError::Status { status: 401, .. })
        ));
        assert_eq!(client.error_marker(), "Groq Error");
    }
}
