//! Model gateway trait and the marker-string degradation
//!
//! A gateway wraps one external text-generation endpoint. Failures are typed
//! (`GatewayError`) inside the gateway; [`ask`] is the single place where a
//! failure is turned into the fixed marker text that flows on through the
//! conversation.

use crate::error::GatewayError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::warn;

/// Stateless wrapper around a remote text-generation endpoint
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Provider name used in logs and in the failure marker
    fn provider(&self) -> &'static str;

    /// One outbound call, no retries
    async fn generate(&self, prompt: &str) -> Result<String, GatewayError>;

    /// Fixed text standing in for a failed call
    fn error_marker(&self) -> String {
        format!("{} Error", self.provider())
    }
}

/// Call a gateway and degrade any failure into its marker string.
pub async fn ask(gateway: &dyn ModelGateway, prompt: &str) -> String {
    match gateway.generate(prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(provider = gateway.provider(), "Model call failed: {}", e);
            gateway.error_marker()
        }
    }
}

/// Gateway that replays queued responses and records every prompt.
///
/// Used for development and testing. Once the queue is empty it echoes a
/// short acknowledgement so long runs keep working.
pub struct ScriptedGateway {
    provider: &'static str,
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(provider: &'static str) -> Self {
        Self {
            provider,
            replies: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    /// Queue a failed call
    pub fn fail(self, reason: impl Into<String>) -> Self {
        self.push(Err(reason.into()));
        self
    }

    fn push(&self, entry: Result<String, String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(entry);
        }
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn generate(&self, prompt: &str) -> Result<String, GatewayError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let next = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());

        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(GatewayError::Scripted(reason)),
            None => Ok(format!("[{}] ok", self.provider)),
        }
    }
}
