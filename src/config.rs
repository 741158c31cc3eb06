//! Environment configuration
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file by the binaries (`dotenv`).

use crate::error::AssistantError;
use crate::memory::{MemoryConfig, SummaryFailurePolicy};
use crate::{gemini, groq, Result};
use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MEMORY_FILE: &str = "chat_history.txt";

/// Connection settings for one model provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub research: ProviderConfig,
    pub synthesis: ProviderConfig,
    pub memory: MemoryConfig,
    pub port: u16,
}

impl AssistantConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let research_key = get("GOOGLE_API_KEY")
            .or_else(|| get("GEMINI_API_KEY"))
            .unwrap_or_else(|| {
                warn!("GOOGLE_API_KEY not set; research calls will degrade to \"Gemini Error\"");
                String::new()
            });

        let synthesis_key = get("GROQ_API_KEY").unwrap_or_else(|| {
            warn!("GROQ_API_KEY not set; synthesis calls will degrade to \"Groq Error\"");
            String::new()
        });

        let research = ProviderConfig {
            api_key: research_key,
            model: get("RESEARCH_MODEL").unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string()),
            base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| gemini::DEFAULT_BASE_URL.to_string()),
        };

        let synthesis = ProviderConfig {
            api_key: synthesis_key,
            model: get("SYNTHESIS_MODEL").unwrap_or_else(|| groq::DEFAULT_MODEL.to_string()),
            base_url: get("GROQ_BASE_URL").unwrap_or_else(|| groq::DEFAULT_BASE_URL.to_string()),
        };

        let mut memory = MemoryConfig {
            file_path: PathBuf::from(
                get("MEMORY_FILE").unwrap_or_else(|| DEFAULT_MEMORY_FILE.to_string()),
            ),
            ..MemoryConfig::default()
        };

        if let Some(raw) = get("SUMMARY_THRESHOLD") {
            memory.summary_threshold = raw.trim().parse().map_err(|_| {
                AssistantError::Config(format!("SUMMARY_THRESHOLD must be an integer, got {:?}", raw))
            })?;
        }

        if let Some(raw) = get("SUMMARY_FAILURE_POLICY") {
            memory.failure_policy = raw.parse::<SummaryFailurePolicy>()?;
        }

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AssistantError::Config(format!("PORT must be a port number, got {:?}", raw))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            research,
            synthesis,
            memory,
            port,
        })
    }
}
