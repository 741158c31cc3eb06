//! Memory store
//!
//! Holds the short-term buffer and the long-term summary and enforces the
//! summarization policy.

use crate::error::AssistantError;
use crate::gateway::ModelGateway;
use crate::memory::{ContextSummarizer, MemoryConfig, MemoryFile, SummaryFailurePolicy, EVICT_BATCH};
use std::collections::VecDeque;
use tracing::{error, info, warn};

/// A single exchange between the user and the assistant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub user: String,
    pub ai: String,
}

impl Turn {
    pub fn new(user: impl Into<String>, ai: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ai: ai.into(),
        }
    }

    /// The two short-term lines this turn contributes, user first
    pub fn lines(&self) -> [String; 2] {
        [format!("User: {}", self.user), format!("AI: {}", self.ai)]
    }
}

/// Result of a maintenance pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceOutcome {
    /// Buffer at or below the threshold
    Idle,
    /// Entries were folded into long-term memory
    Summarized { evicted: usize, persisted: bool },
    /// Summarization failed; the evicted entries were dropped and the
    /// summary and file left as they were
    SummaryFailed { dropped: usize },
}

pub struct MemoryStore {
    short_term: VecDeque<String>,
    long_term: String,
    file: MemoryFile,
    config: MemoryConfig,
}

impl MemoryStore {
    /// Create a store with empty memory, without touching the file
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            short_term: VecDeque::new(),
            long_term: String::new(),
            file: MemoryFile::new(config.file_path.clone()),
            config,
        }
    }

    /// Create a store, seeding long-term memory from the memory file if present
    pub async fn load(config: MemoryConfig) -> crate::Result<Self> {
        let mut store = Self::new(config);

        let long_term = store
            .file
            .load()
            .await
            .map_err(|e| {
                AssistantError::Memory(format!(
                    "failed to read {}: {}",
                    store.file.path().display(),
                    e
                ))
            })?
            .unwrap_or_default();
        store.long_term = long_term;

        Ok(store)
    }

    pub fn short_term(&self) -> &VecDeque<String> {
        &self.short_term
    }

    pub fn long_term(&self) -> &str {
        &self.long_term
    }

    /// Number of short-term entries
    pub fn len(&self) -> usize {
        self.short_term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.short_term.is_empty()
    }

    /// Append a finished exchange to short-term memory
    pub fn record_turn(&mut self, user_text: &str, ai_text: &str) {
        self.short_term.extend(Turn::new(user_text, ai_text).lines());
    }

    /// Context payload for the research gateway: long-term memory, then the
    /// short-term cache, then the question
    pub fn build_context(&self, user_query: &str) -> String {
        let cache = self
            .short_term
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "[LONG TERM MEMORY]:\n{}\n\n[SHORT TERM CACHE]:\n{}\n\n[USER QUESTION]:\n{}\n",
            self.long_term, cache, user_query
        )
    }

    /// Fold the oldest short-term entries into long-term memory once the
    /// buffer exceeds the threshold.
    ///
    /// At most [`EVICT_BATCH`] entries are folded per call. A persistence
    /// failure is logged and otherwise ignored.
    pub async fn maintain(&mut self, summarizer: &dyn ModelGateway) -> MaintenanceOutcome {
        if self.short_term.len() <= self.config.summary_threshold {
            return MaintenanceOutcome::Idle;
        }

        info!(
            entries = self.short_term.len(),
            threshold = self.config.summary_threshold,
            "Memory full, summarizing oldest entries"
        );

        let take = EVICT_BATCH.min(self.short_term.len());
        let evicted: Vec<String> = self.short_term.drain(..take).collect();

        match ContextSummarizer::merge(summarizer, &self.long_term, &evicted).await {
            Ok(summary) => self.long_term = summary,
            Err(e) => match self.config.failure_policy {
                SummaryFailurePolicy::KeepPrevious => {
                    warn!(
                        dropped = evicted.len(),
                        "Summarization failed, keeping previous summary: {}",
                        e
                    );
                    return MaintenanceOutcome::SummaryFailed { dropped: take };
                }
                SummaryFailurePolicy::StoreMarker => {
                    warn!("Summarization failed, storing failure marker: {}", e);
                    self.long_term = summarizer.error_marker();
                }
            },
        }

        let persisted = match self.file.save(&self.long_term).await {
            Ok(()) => {
                info!(path = %self.file.path().display(), "Memory saved");
                true
            }
            Err(e) => {
                error!(
                    path = %self.file.path().display(),
                    "Could not save memory: {}",
                    e
                );
                false
            }
        };

        MaintenanceOutcome::Summarized {
            evicted: take,
            persisted,
        }
    }
}
