//! Long-term memory summarization
//!
//! Folds evicted short-term entries into the running summary with one call
//! to the research gateway.

use crate::error::GatewayError;
use crate::gateway::ModelGateway;
use tracing::info;

pub struct ContextSummarizer;

impl ContextSummarizer {
    /// Prompt asking the model to merge `new_info` into `long_term`
    pub fn merge_prompt(long_term: &str, new_info: &str) -> String {
        format!(
            "Current Long Term Memory: {}\n\
             New Info to Add: {}\n\
             \n\
             Task: Merge the New Info into the Memory. Keep it concise.\n",
            long_term, new_info
        )
    }

    /// Merge evicted entries into the current summary.
    ///
    /// The gateway's error is returned untouched; the caller's failure policy
    /// decides what happens to long-term memory.
    pub async fn merge(
        gateway: &dyn ModelGateway,
        long_term: &str,
        evicted: &[String],
    ) -> Result<String, GatewayError> {
        let new_info = evicted.join("\n");
        let prompt = Self::merge_prompt(long_term, &new_info);

        info!(
            provider = gateway.provider(),
            "Summarizing {} evicted entries into long-term memory",
            evicted.len()
        );

        gateway.generate(&prompt).await
    }
}
