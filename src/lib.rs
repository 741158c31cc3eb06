//! Duet Assistant
//!
//! A conversational assistant that answers through two chained model calls
//! and keeps a two-tier rolling memory:
//! - a research model (Gemini) reads long-term memory, recent turns and the question
//! - a synthesis model (Groq) writes the reply from the research notes
//! - recent turns stay verbatim; older ones are folded into a persisted summary
//!
//! REPLY CYCLE:
//! CONTEXT → RESEARCH → SYNTHESIZE → RECORD → MAINTAIN
//!
//! Memory is a single shared store, meant for one conversation at a time.

pub mod api;
pub mod config;
pub mod conversational;
pub mod error;
pub mod gateway;
pub mod gemini;
pub mod groq;
pub mod logging;
pub mod memory;

pub use error::Result;

// Re-export common types
pub use config::AssistantConfig;
pub use conversational::ConversationOrchestrator;
pub use gateway::ModelGateway;
pub use memory::MemoryStore;

use std::sync::Arc;

/// Wire the configured gateways and the persisted memory into an orchestrator
pub async fn build_orchestrator(config: &AssistantConfig) -> Result<ConversationOrchestrator> {
    let research = Arc::new(gemini::GeminiClient::new(config.research.clone())?);
    let synthesis = Arc::new(groq::GroqClient::new(config.synthesis.clone())?);
    let memory = MemoryStore::load(config.memory.clone()).await?;

    Ok(ConversationOrchestrator::new(research, synthesis, memory))
}
