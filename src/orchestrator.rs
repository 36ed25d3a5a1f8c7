//! Pipeline orchestrator for Vidask.
//!
//! Wires configuration into concrete clients at process start and exposes the
//! two operations the presentation layer consumes: starting an ingestion run
//! and asking a question. Also owns the append-only conversation log.

use crate::completion::{CompletionClient, OpenAICompletion};
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, VidaskError};
use crate::ingest::{IngestionPipeline, IngestionReport, ProgressFn};
use crate::rag::{AnswerEngine, ConversationTurn};
use crate::segmenter::SegmenterConfig;
use crate::transcript::TranscriptClient;
use crate::vector_store::{MemoryVectorIndex, RemoteVectorIndex, VectorIndex};
use crate::video;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// The main orchestrator for the Vidask pipelines.
pub struct Orchestrator {
    transcripts: TranscriptClient,
    pipeline: IngestionPipeline,
    engine: AnswerEngine,
    conversation: Vec<ConversationTurn>,
}

impl Orchestrator {
    /// Create a new orchestrator from settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;

        let prompts = Prompts::load(
            settings
                .prompts
                .custom_path
                .as_deref()
                .map(Path::new),
        )?;

        let embedder: Arc<dyn Embedder> = Arc::new(
            OpenAIEmbedder::with_config(
                &settings.embedding.model,
                settings.embedding.dimensions as usize,
                None,
            ),
        );

        let index: Arc<dyn VectorIndex> = match settings.vector_store.provider.as_str() {
            "memory" => Arc::new(
                MemoryVectorIndex::new(settings.embedding.dimensions as usize)
                    .with_batch_size(settings.vector_store.batch_size),
            ),
            "remote" => {
                let api_key = settings.vector_index_api_key().ok_or_else(|| {
                    VidaskError::Config(
                        "vector index API key is not set (vector_store.api_key or \
                         VECTOR_INDEX_API_KEY)"
                            .to_string(),
                    )
                })?;
                Arc::new(
                    RemoteVectorIndex::new(
                        &settings.vector_store.endpoint,
                        &api_key,
                        &settings.vector_store.namespace,
                        settings.embedding.dimensions as usize,
                    )?
                    .with_batch_size(settings.vector_store.batch_size),
                )
            }
            other => {
                return Err(VidaskError::Config(format!(
                    "Unknown vector store provider: {}",
                    other
                )))
            }
        };

        let completion: Arc<dyn CompletionClient> = Arc::new(
            OpenAICompletion::with_config(&settings.completion.model, None)
                .with_temperature(settings.completion.temperature)
                .with_max_tokens(settings.completion.max_tokens)
                .with_prompts(prompts),
        );

        Self::with_components(settings, embedder, index, completion)
    }

    /// Create an orchestrator with custom components (testability seam).
    pub fn with_components(
        settings: &Settings,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        completion: Arc<dyn CompletionClient>,
    ) -> Result<Self> {
        let transcripts = TranscriptClient::new(
            &settings.transcript.endpoint,
            Duration::from_secs(settings.transcript.timeout_seconds),
        )?;

        let pipeline = IngestionPipeline::new(embedder.clone(), index.clone())
            .with_segmenter(SegmenterConfig {
                target_size: settings.segmenter.target_size,
                overlap: settings.segmenter.overlap,
            })
            .with_embed_batch_size(settings.embedding.batch_size);

        let engine = AnswerEngine::new(embedder, index, completion)
            .with_top_k(settings.vector_store.top_k);

        Ok(Self {
            transcripts,
            pipeline,
            engine,
            conversation: Vec::new(),
        })
    }

    /// Ingest a video: fetch its transcript, segment, embed, and store.
    ///
    /// `input` is a video URL or bare id. Progress is reported through
    /// `on_progress` for the duration of the run.
    #[instrument(skip(self, on_progress), fields(input = %input))]
    pub async fn start_ingestion(
        &self,
        input: &str,
        on_progress: &mut ProgressFn<'_>,
    ) -> Result<IngestionReport> {
        let video_id = video::extract_video_id(input)?;

        info!("Fetching transcript for {}", video_id);
        let transcript = self.transcripts.fetch(&video_id).await?;

        self.pipeline
            .ingest(&video_id, &transcript, on_progress)
            .await
    }

    /// Answer a question about a video, appending both turns to the
    /// conversation log.
    ///
    /// The user turn is appended first, then exactly one assistant turn —
    /// the synthesized answer, or an apology turn if retrieval or synthesis
    /// failed. Only an unparseable video reference is surfaced as an error.
    #[instrument(skip(self, question), fields(input = %input))]
    pub async fn ask_question(&mut self, input: &str, question: &str) -> Result<ConversationTurn> {
        let video_id = video::extract_video_id(input)?;

        self.conversation.push(ConversationTurn::user(question));

        let turn = self.engine.answer(&video_id, question).await;
        self.conversation.push(turn.clone());

        Ok(turn)
    }

    /// The append-only conversation log.
    pub fn conversation(&self) -> &[ConversationTurn] {
        &self.conversation
    }

    /// Clear the conversation log.
    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
    }
}
