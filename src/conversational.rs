//! Conversation orchestrator
//!
//! Runs one reply cycle: research over the remembered context, synthesis of
//! the final answer from the research notes, then memory bookkeeping.
//! Both model calls degrade to marker strings, so a cycle always produces a
//! reply.

use crate::gateway::{ask, ModelGateway};
use crate::memory::{MaintenanceOutcome, MemoryStore};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

/// Shared handle to the process-wide memory store
pub type SharedMemory = Arc<Mutex<MemoryStore>>;

/// Prompt for the synthesis model
pub fn synthesis_prompt(research_notes: &str, user_query: &str) -> String {
    format!(
        "Research Notes: {}\n\
         User Query: {}\n\
         \n\
         Task: Answer the user's question using the research notes.\n",
        research_notes, user_query
    )
}

pub struct ConversationOrchestrator {
    research: Arc<dyn ModelGateway>,
    synthesis: Arc<dyn ModelGateway>,
    memory: SharedMemory,
}

impl ConversationOrchestrator {
    pub fn new(
        research: Arc<dyn ModelGateway>,
        synthesis: Arc<dyn ModelGateway>,
        memory: MemoryStore,
    ) -> Self {
        Self::with_shared_memory(research, synthesis, Arc::new(Mutex::new(memory)))
    }

    pub fn with_shared_memory(
        research: Arc<dyn ModelGateway>,
        synthesis: Arc<dyn ModelGateway>,
        memory: SharedMemory,
    ) -> Self {
        Self {
            research,
            synthesis,
            memory,
        }
    }

    pub fn memory(&self) -> SharedMemory {
        Arc::clone(&self.memory)
    }

    /// Produce a reply to `user_query` and remember the exchange.
    ///
    /// The memory lock is held for the whole cycle, so concurrent callers
    /// run one after another.
    pub async fn run_cycle(&self, user_query: &str) -> String {
        let cycle_id = Uuid::new_v4();
        self.run_cycle_inner(user_query)
            .instrument(info_span!("cycle", %cycle_id))
            .await
    }

    async fn run_cycle_inner(&self, user_query: &str) -> String {
        let mut memory = self.memory.lock().await;

        let context = memory.build_context(user_query);

        info!(provider = self.research.provider(), "Researching");
        let research_notes = ask(self.research.as_ref(), &context).await;

        info!(provider = self.synthesis.provider(), "Synthesizing answer");
        let prompt = synthesis_prompt(&research_notes, user_query);
        let final_output = ask(self.synthesis.as_ref(), &prompt).await;

        memory.record_turn(user_query, &final_output);

        match memory.maintain(self.research.as_ref()).await {
            MaintenanceOutcome::Idle => debug!(entries = memory.len(), "Memory below threshold"),
            outcome => info!(?outcome, entries = memory.len(), "Memory maintenance ran"),
        }

        final_output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ScriptedGateway;
    use crate::memory::{MemoryConfig, SummaryFailurePolicy};
    use tempfile::{tempdir, TempDir};

    struct Harness {
        orchestrator: ConversationOrchestrator,
        research: Arc<ScriptedGateway>,
        synthesis: Arc<ScriptedGateway>,
        _dir: TempDir,
    }

    fn harness(research: ScriptedGateway, synthesis: ScriptedGateway) -> Harness {
        let dir = tempdir().unwrap();
        let memory = MemoryStore::new(MemoryConfig {
            file_path: dir.path().join("chat_history.txt"),
            summary_threshold: 15,
            failure_policy: SummaryFailurePolicy::KeepPrevious,
        });
        let research = Arc::new(research);
        let synthesis = Arc::new(synthesis);

        Harness {
            orchestrator: ConversationOrchestrator::new(
                research.clone(),
                synthesis.clone(),
                memory,
            ),
            research,
            synthesis,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn test_single_cycle_from_empty_memory() {
        let h = harness(
            ScriptedGateway::new("Gemini").reply("RESEARCH-NOTES"),
            ScriptedGateway::new("Groq").reply("Hi! How can I help?"),
        );

        let reply = h.orchestrator.run_cycle("hello").await;
        assert_eq!(reply, "Hi! How can I help?");

        let research_prompts = h.research.prompts();
        assert_eq!(research_prompts.len(), 1);
        assert!(research_prompts[0].contains("hello"));

        let synthesis_prompts = h.synthesis.prompts();
        assert_eq!(synthesis_prompts.len(), 1);
        assert!(synthesis_prompts[0].contains("RESEARCH-NOTES"));
        assert!(synthesis_prompts[0].contains("hello"));

        let memory = h.orchestrator.memory();
        let memory = memory.lock().await;
        let entries: Vec<_> = memory.short_term().iter().cloned().collect();
        assert_eq!(entries, vec!["User: hello", "AI: Hi! How can I help?"]);
    }

    #[tokio::test]
    async fn test_research_failure_still_returns_reply() {
        let h = harness(
            ScriptedGateway::new("Gemini").fail("connection refused"),
            ScriptedGateway::new("Groq").reply("answer without notes"),
        );

        let reply = h.orchestrator.run_cycle("what now?").await;
        assert_eq!(reply, "answer without notes");
        assert!(h.synthesis.prompts()[0].contains("Research Notes: Gemini Error"));
    }

    #[tokio::test]
    async fn test_synthesis_failure_returns_marker() {
        let h = harness(
            ScriptedGateway::new("Gemini").reply("notes"),
            ScriptedGateway::new("Groq").fail("rate limited"),
        );

        let reply = h.orchestrator.run_cycle("hello").await;
        assert_eq!(reply, "Groq Error");

        let memory = h.orchestrator.memory();
        let memory = memory.lock().await;
        assert_eq!(memory.short_term()[1], "AI: Groq Error");
    }

    #[tokio::test]
    async fn test_context_includes_previous_turns() {
        let h = harness(
            ScriptedGateway::new("Gemini"),
            ScriptedGateway::new("Groq").reply("Nice to meet you, Ada"),
        );

        h.orchestrator.run_cycle("my name is Ada").await;
        h.orchestrator.run_cycle("what is my name?").await;

        let second_context = &h.research.prompts()[1];
        let earlier = second_context.find("User: my name is Ada").unwrap();
        let current = second_context.find("what is my name?").unwrap();
        assert!(earlier < current);
    }

    #[tokio::test]
    async fn test_eighth_cycle_triggers_summarization() {
        let h = harness(ScriptedGateway::new("Gemini"), ScriptedGateway::new("Groq"));

        for i in 0..8 {
            h.orchestrator.run_cycle(&format!("message {}", i)).await;
        }
        // 8 cycles: 16 entries, maintenance already ran once after the 8th
        assert_eq!(h.research.prompts().len(), 9);

        let memory = h.orchestrator.memory();
        let memory = memory.lock().await;
        assert_eq!(memory.len(), 14);
        assert_eq!(memory.short_term()[0], "User: message 1");
        assert_eq!(memory.long_term(), "[Gemini] ok");
    }

    #[tokio::test]
    async fn test_concurrent_cycles_keep_turns_paired() {
        let h = harness(ScriptedGateway::new("Gemini"), ScriptedGateway::new("Groq"));
        let orchestrator = Arc::new(h.orchestrator);

        let tasks: Vec<_> = (0..5)
            .map(|i| {
                let orchestrator = Arc::clone(&orchestrator);
                tokio::spawn(async move { orchestrator.run_cycle(&format!("q{}", i)).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let memory = orchestrator.memory();
        let memory = memory.lock().await;
        assert_eq!(memory.len(), 10);
        for pair in memory.short_term().iter().collect::<Vec<_>>().chunks(2) {
            assert!(pair[0].starts_with("User: q"));
            assert!(pair[1].starts_with("AI: "));
        }
    }
}
