//! Ingestion pipeline: transcript text to persisted, queryable vectors.
//!
//! One run walks `Segmenting -> Embedding(batch i of N) -> Upserting ->
//! Completed`, with any step transitioning to `Failed` on error. Progress is
//! reported after every embedding sub-batch; the sub-batch size is kept well
//! below the upsert batch size because embedding-provider per-call limits are
//! tighter.

use crate::embedding::Embedder;
use crate::error::Result;
use crate::segmenter::{self, SegmenterConfig};
use crate::vector_store::{RecordMetadata, VectorIndex, VectorRecord};
use crate::video;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Default number of chunks per embedding sub-batch.
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 5;

/// Status of one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionStatus {
    /// Splitting the transcript into chunks.
    Segmenting,
    /// Embedding chunks, sub-batch by sub-batch.
    Embedding,
    /// Writing the embedded set to the vector index.
    Upserting,
    /// Terminal: all chunks are stored.
    Completed,
    /// Terminal: the run aborted.
    Failed,
}

/// Ephemeral progress of one ingestion run.
#[derive(Debug, Clone, Copy)]
pub struct IngestionProgress {
    /// Current pipeline stage.
    pub status: IngestionStatus,
    /// Chunk count fixed after segmentation.
    pub total_chunks: usize,
    /// Chunks embedded so far; monotonically non-decreasing.
    pub processed_chunks: usize,
    /// One-based embedding sub-batch in flight.
    pub current_batch: usize,
    /// Total embedding sub-batches.
    pub total_batches: usize,
}

/// Result of a completed ingestion run.
#[derive(Debug)]
pub struct IngestionReport {
    /// Video the transcript belongs to.
    pub video_id: String,
    /// Number of chunks embedded and stored.
    pub chunks_indexed: usize,
    /// Number of upsert batch writes issued.
    pub upsert_batches: usize,
}

/// Observer invoked after each progress transition.
pub type ProgressFn<'a> = dyn FnMut(IngestionProgress) + Send + 'a;

/// Orchestrates Segmenter -> Embedder -> VectorIndex for one transcript.
pub struct IngestionPipeline {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    segmenter: SegmenterConfig,
    embed_batch_size: usize,
}

impl IngestionPipeline {
    /// Create a new ingestion pipeline.
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            embedder,
            index,
            segmenter: SegmenterConfig::default(),
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
        }
    }

    /// Set the segmenter configuration.
    pub fn with_segmenter(mut self, config: SegmenterConfig) -> Self {
        self.segmenter = config;
        self
    }

    /// Set the embedding sub-batch size.
    pub fn with_embed_batch_size(mut self, size: usize) -> Self {
        self.embed_batch_size = size.max(1);
        self
    }

    /// Ingest one transcript, reporting progress along the way.
    ///
    /// Record identifiers are deterministic per `(video_id, chunk index)`, so
    /// re-running the same video overwrites prior vectors instead of
    /// duplicating them. On failure a terminal `Failed` progress is emitted
    /// with the counters of the last report before the error, and the error
    /// returned; nothing is retried.
    #[instrument(skip(self, transcript, on_progress), fields(video_id = %video_id))]
    pub async fn ingest(
        &self,
        video_id: &str,
        transcript: &str,
        on_progress: &mut ProgressFn<'_>,
    ) -> Result<IngestionReport> {
        let mut last = IngestionProgress {
            status: IngestionStatus::Segmenting,
            total_chunks: 0,
            processed_chunks: 0,
            current_batch: 0,
            total_batches: 0,
        };

        let result = {
            let mut observe = |p: IngestionProgress| {
                last = p;
                on_progress(p);
            };
            self.run(video_id, transcript, &mut observe).await
        };

        match result {
            Ok(report) => Ok(report),
            Err(e) => {
                on_progress(IngestionProgress {
                    status: IngestionStatus::Failed,
                    ..last
                });
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        video_id: &str,
        transcript: &str,
        on_progress: &mut ProgressFn<'_>,
    ) -> Result<IngestionReport> {
        on_progress(IngestionProgress {
            status: IngestionStatus::Segmenting,
            total_chunks: 0,
            processed_chunks: 0,
            current_batch: 0,
            total_batches: 0,
        });

        // Segmentation runs up front so the chunk count is known before
        // embedding begins.
        let chunks = segmenter::segment(transcript, &self.segmenter)?;
        let total_chunks = chunks.len();
        let total_batches = total_chunks.div_ceil(self.embed_batch_size);
        let source_url = video::watch_url(video_id);
        let ingested_at = Utc::now();

        info!(
            "Segmented transcript into {} chunks ({} embedding batches)",
            total_chunks, total_batches
        );

        let mut records: Vec<VectorRecord> = Vec::with_capacity(total_chunks);

        for (batch_index, batch) in chunks.chunks(self.embed_batch_size).enumerate() {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embeddings = self.embedder.embed_batch(&texts).await?;

            debug!(
                "Embedded batch {}/{} ({} chunks)",
                batch_index + 1,
                total_batches,
                batch.len()
            );

            for (chunk, values) in batch.iter().zip(embeddings) {
                records.push(VectorRecord {
                    id: VectorRecord::chunk_id(video_id, chunk.sequence_index),
                    values,
                    metadata: RecordMetadata {
                        video_id: video_id.to_string(),
                        chunk_index: chunk.sequence_index,
                        text: chunk.text.clone(),
                        source_url: source_url.clone(),
                        ingested_at,
                    },
                });
            }

            on_progress(IngestionProgress {
                status: IngestionStatus::Embedding,
                total_chunks,
                processed_chunks: records.len(),
                current_batch: batch_index + 1,
                total_batches,
            });
        }

        on_progress(IngestionProgress {
            status: IngestionStatus::Upserting,
            total_chunks,
            processed_chunks: total_chunks,
            current_batch: total_batches,
            total_batches,
        });

        let summary = self.index.upsert(&records).await?;

        info!(
            "Ingested {} chunks for {} in {} upsert batches",
            summary.upserted, video_id, summary.batches
        );

        on_progress(IngestionProgress {
            status: IngestionStatus::Completed,
            total_chunks,
            processed_chunks: total_chunks,
            current_batch: total_batches,
            total_batches,
        });

        Ok(IngestionReport {
            video_id: video_id.to_string(),
            chunks_indexed: summary.upserted,
            upsert_batches: summary.batches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedder;
    use crate::error::VidaskError;
    use crate::vector_store::MemoryVectorIndex;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic embedder: each vector encodes the text length.
    struct FakeEmbedder {
        dimensions: usize,
        fail: bool,
    }

    impl FakeEmbedder {
        fn new(dimensions: usize) -> Self {
            Self {
                dimensions,
                fail: false,
            }
        }

        fn failing(dimensions: usize) -> Self {
            Self {
                dimensions,
                fail: true,
            }
        }

        fn vector_for(&self, text: &str) -> Vec<f32> {
            let mut v = vec![0.0; self.dimensions];
            for (i, b) in text.bytes().enumerate() {
                v[i % self.dimensions] += b as f32 * ((i % 13) + 1) as f32;
            }
            v
        }
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> crate::error::Result<Vec<f32>> {
            let batch = self.embed_batch(&[text.to_string()]).await?;
            Ok(batch.into_iter().next().unwrap())
        }

        async fn embed_batch(&self, texts: &[String]) -> crate::error::Result<Vec<Vec<f32>>> {
            if self.fail {
                return Err(VidaskError::EmbeddingBatch {
                    batch: 0,
                    embedded: 0,
                    message: "injected embedding failure".to_string(),
                });
            }
            Ok(texts.iter().map(|t| self.vector_for(t)).collect())
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }
    }

    /// Embedder that succeeds until a given zero-based batch call, then fails.
    struct FlakyEmbedder {
        inner: FakeEmbedder,
        fail_at_call: usize,
        calls: AtomicUsize,
    }

    impl FlakyEmbedder {
        fn failing_at_call(dimensions: usize, fail_at_call: usize) -> Self {
            Self {
                inner: FakeEmbedder::new(dimensions),
                fail_at_call,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Embedder for FlakyEmbedder {
        async fn embed(&self, text: &str) -> crate::error::Result<Vec<f32>> {
            let batch = self.embed_batch(&[text.to_string()]).await?;
            Ok(batch.into_iter().next().unwrap())
        }

        async fn embed_batch(&self, texts: &[String]) -> crate::error::Result<Vec<Vec<f32>>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == self.fail_at_call {
                return Err(VidaskError::EmbeddingBatch {
                    batch: call,
                    embedded: 0,
                    message: "injected embedding failure".to_string(),
                });
            }
            self.inner.embed_batch(texts).await
        }

        fn dimensions(&self) -> usize {
            self.inner.dimensions()
        }
    }

    fn sample_transcript() -> String {
        let mut text = String::new();
        for i in 0..60 {
            text.push_str(&format!("Sentence {} covers a topic in the video. ", i));
        }
        text
    }

    fn pipeline_with(
        embedder: FakeEmbedder,
        index: Arc<MemoryVectorIndex>,
        embed_batch_size: usize,
    ) -> IngestionPipeline {
        IngestionPipeline::new(Arc::new(embedder), index)
            .with_segmenter(SegmenterConfig {
                target_size: 400,
                overlap: 50,
            })
            .with_embed_batch_size(embed_batch_size)
    }

    #[tokio::test]
    async fn test_ingest_stores_deterministic_ids() {
        let index = Arc::new(MemoryVectorIndex::new(3));
        let pipeline = pipeline_with(FakeEmbedder::new(3), index.clone(), 5);

        let mut progress = Vec::new();
        let report = pipeline
            .ingest("video1", &sample_transcript(), &mut |p| progress.push(p))
            .await
            .unwrap();

        assert!(report.chunks_indexed > 1);
        assert_eq!(index.record_count(), report.chunks_indexed);
        assert_eq!(progress.last().unwrap().status, IngestionStatus::Completed);

        let ids = index.record_ids();
        for i in 0..report.chunks_indexed {
            assert!(ids.contains(&format!("chunk-video1-{}", i)));
        }
    }

    #[tokio::test]
    async fn test_reingestion_is_idempotent() {
        let index = Arc::new(MemoryVectorIndex::new(3));
        let pipeline = pipeline_with(FakeEmbedder::new(3), index.clone(), 5);

        let transcript = sample_transcript();
        let mut noop = |_p: IngestionProgress| {};

        pipeline.ingest("video1", &transcript, &mut noop).await.unwrap();
        let ids_first = index.record_ids();

        pipeline.ingest("video1", &transcript, &mut noop).await.unwrap();
        let ids_second = index.record_ids();

        assert_eq!(ids_first, ids_second);
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_terminal() {
        let index = Arc::new(MemoryVectorIndex::new(3));
        let pipeline = pipeline_with(FakeEmbedder::new(3), index, 2);

        let mut progress = Vec::new();
        pipeline
            .ingest("video1", &sample_transcript(), &mut |p| progress.push(p))
            .await
            .unwrap();

        assert_eq!(progress.first().unwrap().status, IngestionStatus::Segmenting);
        assert_eq!(progress.last().unwrap().status, IngestionStatus::Completed);

        let mut last_processed = 0;
        for p in &progress {
            assert!(p.processed_chunks >= last_processed);
            assert!(p.processed_chunks <= p.total_chunks || p.total_chunks == 0);
            last_processed = p.processed_chunks;
        }

        let total = progress.last().unwrap().total_chunks;
        assert_eq!(progress.last().unwrap().processed_chunks, total);
    }

    #[tokio::test]
    async fn test_order_preserved_across_batch_sizes() {
        let transcript = sample_transcript();

        for embed_batch_size in [1, 2, 100] {
            let index = Arc::new(MemoryVectorIndex::new(3));
            let pipeline = pipeline_with(FakeEmbedder::new(3), index.clone(), embed_batch_size);

            let mut noop = |_p: IngestionProgress| {};
            let report = pipeline.ingest("video1", &transcript, &mut noop).await.unwrap();

            // Each record's vector must match its own chunk text, regardless
            // of how the batching landed.
            let reference = FakeEmbedder::new(3);
            let chunks = segmenter::segment(
                &transcript,
                &SegmenterConfig {
                    target_size: 400,
                    overlap: 50,
                },
            )
            .unwrap();
            assert_eq!(chunks.len(), report.chunks_indexed);

            for chunk in &chunks {
                let record = index
                    .get(&VectorRecord::chunk_id("video1", chunk.sequence_index))
                    .expect("record missing");
                assert_eq!(
                    record.values,
                    reference.vector_for(&chunk.text),
                    "batch size {}",
                    embed_batch_size
                );
                assert_eq!(record.metadata.chunk_index, chunk.sequence_index);
            }
        }
    }

    #[tokio::test]
    async fn test_embedding_failure_aborts_without_writes() {
        let index = Arc::new(MemoryVectorIndex::new(3));
        let pipeline = pipeline_with(FakeEmbedder::failing(3), index.clone(), 5);

        let mut progress = Vec::new();
        let err = pipeline
            .ingest("video1", &sample_transcript(), &mut |p| progress.push(p))
            .await
            .unwrap_err();

        assert!(matches!(err, VidaskError::EmbeddingBatch { .. }));
        assert_eq!(progress.last().unwrap().status, IngestionStatus::Failed);
        assert_eq!(index.record_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_progress_keeps_last_counts() {
        let index = Arc::new(MemoryVectorIndex::new(3));
        // Embed two chunks per call and fail on the second call, so one
        // sub-batch has already been reported when the run aborts.
        let pipeline = IngestionPipeline::new(
            Arc::new(FlakyEmbedder::failing_at_call(3, 1)),
            index.clone(),
        )
        .with_segmenter(SegmenterConfig {
            target_size: 400,
            overlap: 50,
        })
        .with_embed_batch_size(2);

        let mut progress = Vec::new();
        let err = pipeline
            .ingest("video1", &sample_transcript(), &mut |p| progress.push(p))
            .await
            .unwrap_err();
        assert!(matches!(err, VidaskError::EmbeddingBatch { .. }));

        let last_embedding = progress
            .iter()
            .rev()
            .find(|p| p.status == IngestionStatus::Embedding)
            .copied()
            .expect("one embedding sub-batch should have been reported");
        assert_eq!(last_embedding.processed_chunks, 2);
        assert_eq!(last_embedding.current_batch, 1);

        let failed = progress.last().unwrap();
        assert_eq!(failed.status, IngestionStatus::Failed);
        assert_eq!(failed.total_chunks, last_embedding.total_chunks);
        assert_eq!(failed.processed_chunks, last_embedding.processed_chunks);
        assert_eq!(failed.current_batch, last_embedding.current_batch);
        assert_eq!(failed.total_batches, last_embedding.total_batches);

        // Counters never go backwards, the terminal report included.
        let mut last_processed = 0;
        for p in &progress {
            assert!(p.processed_chunks >= last_processed);
            last_processed = p.processed_chunks;
        }

        assert_eq!(index.record_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_transcript_fails() {
        let index = Arc::new(MemoryVectorIndex::new(3));
        let pipeline = pipeline_with(FakeEmbedder::new(3), index, 5);

        let mut noop = |_p: IngestionProgress| {};
        let err = pipeline.ingest("video1", "   ", &mut noop).await.unwrap_err();
        assert!(matches!(err, VidaskError::EmptyInput(_)));
    }

    #[tokio::test]
    async fn test_metadata_carries_source_fields() {
        let index = Arc::new(MemoryVectorIndex::new(3));
        let pipeline = pipeline_with(FakeEmbedder::new(3), index.clone(), 5);

        let mut noop = |_p: IngestionProgress| {};
        pipeline
            .ingest("dQw4w9WgXcQ", &sample_transcript(), &mut noop)
            .await
            .unwrap();

        let reference = FakeEmbedder::new(3);
        let matches = index
            .query(&reference.vector_for("x"), "dQw4w9WgXcQ", 1)
            .await
            .unwrap();
        let metadata = &matches[0].metadata;
        assert_eq!(metadata.video_id, "dQw4w9WgXcQ");
        assert_eq!(
            metadata.source_url,
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert!(!metadata.text.is_empty());
    }
}
