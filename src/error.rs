//! Error types for the assistant

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {

    // =============================
    // Startup Errors
    // =============================

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Memory error: {0}")]
    Memory(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single outbound model call.
///
/// Never crosses the orchestrator boundary: [`crate::gateway::ask`] turns it
/// into the provider's marker string.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{provider} API key not configured")]
    MissingApiKey { provider: &'static str },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("response contained no text")]
    EmptyResponse,

    #[error("scripted failure: {0}")]
    Scripted(String),
}
