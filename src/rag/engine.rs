//! Answer generation from the vector index.

use super::ConversationTurn;
use crate::completion::CompletionClient;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::vector_store::{VectorIndex, DEFAULT_TOP_K};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Shown to the user when any retrieval or synthesis step fails.
const FALLBACK_ANSWER: &str =
    "Sorry, something went wrong while answering your question. Please try again.";

/// Retrieval & synthesis pipeline for one question at a time.
///
/// Steps are strictly sequential: embed the question, query the index scoped
/// to the video, then hand the matches to the completion client.
pub struct AnswerEngine {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    completion: Arc<dyn CompletionClient>,
    top_k: usize,
}

impl AnswerEngine {
    /// Create a new answer engine.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        completion: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            embedder,
            index,
            completion,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Set the number of matches retrieved per question.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Answer a question about one video.
    ///
    /// Failures are absorbed at this boundary: the user sees a generic
    /// apology turn rather than raw provider errors, preserving conversation
    /// continuity.
    #[instrument(skip(self, question), fields(video_id = %video_id))]
    pub async fn answer(&self, video_id: &str, question: &str) -> ConversationTurn {
        match self.try_answer(video_id, question).await {
            Ok(answer) => ConversationTurn::assistant(answer),
            Err(e) => {
                warn!("Failed to answer question: {}", e);
                ConversationTurn::assistant(FALLBACK_ANSWER)
            }
        }
    }

    /// Answer a question, propagating errors to the caller.
    pub async fn try_answer(&self, video_id: &str, question: &str) -> Result<String> {
        let query_embedding = self.embedder.embed(question).await?;

        let matches = self
            .index
            .query(&query_embedding, video_id, self.top_k)
            .await?;

        info!(
            "Retrieved {} matches for question about {}",
            matches.len(),
            video_id
        );

        // Zero matches still reach the completion client; its prompt handles
        // the "no results" case.
        self.completion.complete(question, &matches).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{format_matches, CompletionClient};
    use crate::error::VidaskError;
    use crate::rag::Role;
    use crate::vector_store::{MemoryVectorIndex, QueryMatch, RecordMetadata, VectorRecord};
    use async_trait::async_trait;
    use chrono::Utc;

    struct FakeEmbedder {
        dimensions: usize,
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut v = vec![0.0; self.dimensions];
            for (i, b) in text.bytes().enumerate() {
                v[i % self.dimensions] += b as f32;
            }
            Ok(v)
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for t in texts {
                out.push(self.embed(t).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }
    }

    /// Echoes the serialized match list instead of calling a provider.
    struct FakeCompletion;

    #[async_trait]
    impl CompletionClient for FakeCompletion {
        async fn complete(&self, question: &str, matches: &[QueryMatch]) -> Result<String> {
            Ok(format!("Q: {}\n{}", question, format_matches(matches)))
        }
    }

    struct FailingCompletion;

    #[async_trait]
    impl CompletionClient for FailingCompletion {
        async fn complete(&self, _question: &str, _matches: &[QueryMatch]) -> Result<String> {
            Err(VidaskError::Completion("provider unavailable".to_string()))
        }
    }

    fn record(video_id: &str, index: usize, values: Vec<f32>) -> VectorRecord {
        VectorRecord {
            id: VectorRecord::chunk_id(video_id, index),
            values,
            metadata: RecordMetadata {
                video_id: video_id.to_string(),
                chunk_index: index,
                text: format!("excerpt {}", index),
                source_url: format!("https://www.youtube.com/watch?v={}", video_id),
                ingested_at: Utc::now(),
            },
        }
    }

    fn engine(index: Arc<MemoryVectorIndex>) -> AnswerEngine {
        AnswerEngine::new(
            Arc::new(FakeEmbedder { dimensions: 3 }),
            index,
            Arc::new(FakeCompletion),
        )
    }

    #[tokio::test]
    async fn test_answer_uses_retrieved_matches() {
        let index = Arc::new(MemoryVectorIndex::new(3));
        index
            .upsert(&[
                record("video1", 0, vec![1.0, 0.0, 0.0]),
                record("video1", 1, vec![0.0, 1.0, 0.0]),
            ])
            .await
            .unwrap();

        let turn = engine(index).answer("video1", "What is covered?").await;
        assert_eq!(turn.role, Role::Assistant);
        assert!(turn.content.contains("What is covered?"));
        assert!(turn.content.contains("excerpt"));
    }

    #[tokio::test]
    async fn test_zero_matches_still_produces_answer() {
        let index = Arc::new(MemoryVectorIndex::new(3));

        let turn = engine(index).answer("video1", "Anything?").await;
        assert_eq!(turn.role, Role::Assistant);
        assert!(turn.content.contains("no relevant excerpts"));
    }

    #[tokio::test]
    async fn test_completion_failure_becomes_apology_turn() {
        let index = Arc::new(MemoryVectorIndex::new(3));
        let engine = AnswerEngine::new(
            Arc::new(FakeEmbedder { dimensions: 3 }),
            index,
            Arc::new(FailingCompletion),
        );

        let turn = engine.answer("video1", "Anything?").await;
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_matches_scoped_to_video() {
        let index = Arc::new(MemoryVectorIndex::new(3));
        index
            .upsert(&[
                record("video1", 0, vec![1.0, 0.0, 0.0]),
                record("video2", 0, vec![1.0, 0.0, 0.0]),
            ])
            .await
            .unwrap();

        let engine = engine(index);
        let answer = engine.try_answer("video2", "Scoped?").await.unwrap();
        // Only one record belongs to video2
        assert_eq!(answer.matches("excerpt").count(), 1);
    }

    #[tokio::test]
    async fn test_top_k_bounds_matches() {
        let index = Arc::new(MemoryVectorIndex::new(3));
        let records: Vec<VectorRecord> = (0..10)
            .map(|i| record("video1", i, vec![1.0, i as f32 * 0.1, 0.0]))
            .collect();
        index.upsert(&records).await.unwrap();

        let engine = engine(index).with_top_k(3);
        let answer = engine.try_answer("video1", "Bounded?").await.unwrap();
        assert_eq!(answer.matches("excerpt").count(), 3);
    }
}
