//! In-memory vector index implementation.
//!
//! Useful for testing and offline development. Mirrors the remote index
//! semantics: batched writes, dimension validation, per-video query filtering.

use super::{
    check_dimensions, cosine_similarity, QueryMatch, UpsertSummary, VectorIndex, VectorRecord,
    DEFAULT_UPSERT_BATCH_SIZE,
};
use crate::error::{Result, VidaskError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory vector index.
pub struct MemoryVectorIndex {
    records: RwLock<HashMap<String, VectorRecord>>,
    dimensions: usize,
    batch_size: usize,
    /// Zero-based batch index at which upsert fails (for partial-write tests).
    fail_at_batch: Option<usize>,
}

impl MemoryVectorIndex {
    /// Create a new in-memory index with the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            dimensions,
            batch_size: DEFAULT_UPSERT_BATCH_SIZE,
            fail_at_batch: None,
        }
    }

    /// Set the number of records per upsert batch.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Make the given upsert batch fail, leaving earlier batches written.
    pub fn failing_at_batch(mut self, batch: usize) -> Self {
        self.fail_at_batch = Some(batch);
        self
    }

    /// Total number of stored records.
    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Sorted identifiers of all stored records.
    pub fn record_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records.read().unwrap().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Look up a stored record by identifier.
    pub fn get(&self, id: &str) -> Option<VectorRecord> {
        self.records.read().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<UpsertSummary> {
        for record in records {
            check_dimensions(self.dimensions, record.values.len())?;
        }

        let mut upserted = 0usize;
        let mut batches = 0usize;

        for (batch_index, batch) in records.chunks(self.batch_size).enumerate() {
            if self.fail_at_batch == Some(batch_index) {
                return Err(VidaskError::UpsertBatch {
                    batch: batch_index,
                    upserted,
                    message: "injected batch failure".to_string(),
                });
            }

            let mut store = self.records.write().unwrap();
            for record in batch {
                store.insert(record.id.clone(), record.clone());
            }
            upserted += batch.len();
            batches += 1;
        }

        Ok(UpsertSummary { upserted, batches })
    }

    async fn query(
        &self,
        vector: &[f32],
        video_id: &str,
        top_k: usize,
    ) -> Result<Vec<QueryMatch>> {
        check_dimensions(self.dimensions, vector.len())?;

        let records = self.records.read().unwrap();

        let mut matches: Vec<QueryMatch> = records
            .values()
            .filter(|r| r.metadata.video_id == video_id)
            .map(|r| QueryMatch {
                id: r.id.clone(),
                score: cosine_similarity(vector, &r.values),
                metadata: r.metadata.clone(),
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(top_k);

        Ok(matches)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
