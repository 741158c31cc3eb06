//! Two-tier conversation memory
//!
//! Short-term memory keeps recent turns verbatim; once it grows past the
//! summarization threshold the oldest entries are folded into a single
//! long-term summary, which is written through to a text file.

pub mod persistence;
pub mod store;
pub mod summarizer;

pub use persistence::MemoryFile;
pub use store::{MaintenanceOutcome, MemoryStore, Turn};
pub use summarizer::ContextSummarizer;

use crate::error::AssistantError;
use std::path::PathBuf;
use std::str::FromStr;

/// Number of short-term entries folded into long-term memory per maintenance pass
pub const EVICT_BATCH: usize = 2;

/// What to do with long-term memory when the summarization call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFailurePolicy {
    /// Leave summary and file untouched; the evicted entries are dropped so
    /// the short-term buffer stays bounded during an outage
    #[default]
    KeepPrevious,
    /// Replace the summary with the gateway's failure marker and persist it
    StoreMarker,
}

impl FromStr for SummaryFailurePolicy {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "keep-previous" | "keep" => Ok(Self::KeepPrevious),
            "store-marker" | "store" => Ok(Self::StoreMarker),
            other => Err(AssistantError::Config(format!(
                "unknown summary failure policy: {}",
                other
            ))),
        }
    }
}

/// Configuration for the memory store
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Where long-term memory is persisted
    pub file_path: PathBuf,
    /// Short-term entry count above which summarization runs
    pub summary_threshold: usize,
    pub failure_policy: SummaryFailurePolicy,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from(crate::config::DEFAULT_MEMORY_FILE),
            summary_threshold: 15,
            failure_policy: SummaryFailurePolicy::default(),
        }
    }
}
