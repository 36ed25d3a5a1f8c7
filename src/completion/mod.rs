//! Completion generation: retrieved matches plus a question into prose.

mod openai;

pub use openai::OpenAICompletion;

use crate::error::Result;
use crate::vector_store::QueryMatch;
use async_trait::async_trait;

/// Trait for completion providers.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a formatted answer for a question from retrieved matches.
    ///
    /// An empty match list is valid input; the prompt instructs the model to
    /// report that no relevant content was found.
    async fn complete(&self, question: &str, matches: &[QueryMatch]) -> Result<String>;
}

/// Serialize retrieved matches into a prompt-ready excerpt list.
pub fn format_matches(matches: &[QueryMatch]) -> String {
    if matches.is_empty() {
        return "(no relevant excerpts were found for this question)".to_string();
    }

    matches
        .iter()
        .enumerate()
        .map(|(i, m)| {
            format!(
                "---\n[{}] chunk {} (score: {:.3})\n{}\n---",
                i + 1,
                m.metadata.chunk_index,
                m.score,
                m.metadata.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
