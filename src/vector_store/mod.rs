//! Vector index abstraction for Vidask.
//!
//! Provides a trait-based interface over the external vector index, with
//! strongly-typed records validated at the client boundary.

mod memory;
mod remote;

pub use memory::MemoryVectorIndex;
pub use remote::RemoteVectorIndex;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of records per upsert batch.
pub const DEFAULT_UPSERT_BATCH_SIZE: usize = 100;

/// Default number of matches returned by a query.
pub const DEFAULT_TOP_K: usize = 5;

/// Metadata stored alongside each vector.
///
/// `video_id` partitions the index into independent per-video subsets;
/// queries always filter on it to avoid cross-video leakage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    /// External video identifier.
    pub video_id: String,
    /// Zero-based chunk position within the source transcript.
    pub chunk_index: usize,
    /// Text content of the chunk.
    pub text: String,
    /// Canonical URL of the source video.
    pub source_url: String,
    /// When this record was ingested.
    pub ingested_at: DateTime<Utc>,
}

/// A vector with its identifier and metadata, ready for upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Deterministic record identifier (`chunk-<videoId>-<sequenceIndex>`),
    /// so re-ingesting a video overwrites rather than duplicates.
    pub id: String,
    /// Embedding values.
    pub values: Vec<f32>,
    /// Metadata bag.
    pub metadata: RecordMetadata,
}

impl VectorRecord {
    /// Deterministic identifier for a chunk of a video.
    pub fn chunk_id(video_id: &str, sequence_index: usize) -> String {
        format!("chunk-{}-{}", video_id, sequence_index)
    }
}

/// A query match with its similarity score.
#[derive(Debug, Clone)]
pub struct QueryMatch {
    /// Record identifier.
    pub id: String,
    /// Similarity score as reported by the index (higher is better).
    pub score: f32,
    /// Record metadata.
    pub metadata: RecordMetadata,
}

/// Summary of a completed upsert call.
#[derive(Debug, Clone, Copy)]
pub struct UpsertSummary {
    /// Number of records written.
    pub upserted: usize,
    /// Number of batch writes issued.
    pub batches: usize,
}

/// Trait for vector index implementations.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Upsert records in sequential batches.
    ///
    /// Each batch write is atomic from the caller's point of view, but the
    /// overall call is not atomic across batches: a mid-run failure leaves a
    /// prefix durably written and surfaces the failing batch index.
    async fn upsert(&self, records: &[VectorRecord]) -> Result<UpsertSummary>;

    /// Query the nearest `top_k` records for one video.
    ///
    /// Results are ordered by descending score as reported by the index; an
    /// empty match set is a valid, non-error outcome.
    async fn query(&self, vector: &[f32], video_id: &str, top_k: usize)
        -> Result<Vec<QueryMatch>>;

    /// Fixed dimensionality of the index.
    fn dimensions(&self) -> usize;
}

/// Validate a vector length against the index dimensionality.
pub(crate) fn check_dimensions(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(crate::error::VidaskError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
