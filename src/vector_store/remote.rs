//! Remote vector index client.
//!
//! Talks to a Pinecone-style HTTP API: `POST /vectors/upsert` and
//! `POST /query`, authenticated with an `Api-Key` header and scoped to a
//! logical namespace shared across all videos.

use super::{
    check_dimensions, QueryMatch, RecordMetadata, UpsertSummary, VectorIndex, VectorRecord,
    DEFAULT_UPSERT_BATCH_SIZE,
};
use crate::error::{Result, VidaskError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Default timeout for vector index requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for a remote vector index.
pub struct RemoteVectorIndex {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    namespace: String,
    dimensions: usize,
    batch_size: usize,
}

impl RemoteVectorIndex {
    /// Create a new remote index client.
    pub fn new(endpoint: &str, api_key: &str, namespace: &str, dimensions: usize) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| VidaskError::Config(format!("Invalid index endpoint: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            api_key: api_key.to_string(),
            namespace: namespace.to_string(),
            dimensions,
            batch_size: DEFAULT_UPSERT_BATCH_SIZE,
        })
    }

    /// Set the number of records per upsert batch.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    fn api_url(&self, path: &str) -> Result<Url> {
        self.endpoint
            .join(path)
            .map_err(|e| VidaskError::Config(format!("Invalid index endpoint path: {}", e)))
    }

    async fn upsert_batch(&self, batch: &[VectorRecord]) -> std::result::Result<(), String> {
        let body = UpsertRequest {
            vectors: batch,
            namespace: &self.namespace,
        };

        let response = self
            .http
            .post(self.api_url("vectors/upsert").map_err(|e| e.to_string())?)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(format!("index returned {}: {}", status, text));
        }

        Ok(())
    }
}

#[async_trait]
impl VectorIndex for RemoteVectorIndex {
    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn upsert(&self, records: &[VectorRecord]) -> Result<UpsertSummary> {
        for record in records {
            check_dimensions(self.dimensions, record.values.len())?;
        }

        let mut upserted = 0usize;
        let mut batches = 0usize;

        for (batch_index, batch) in records.chunks(self.batch_size).enumerate() {
            debug!(
                "Upserting batch {} ({} records) to namespace {}",
                batch_index,
                batch.len(),
                self.namespace
            );

            self.upsert_batch(batch)
                .await
                .map_err(|message| VidaskError::UpsertBatch {
                    batch: batch_index,
                    upserted,
                    message,
                })?;

            upserted += batch.len();
            batches += 1;
        }

        Ok(UpsertSummary { upserted, batches })
    }

    #[instrument(skip(self, vector), fields(video_id = %video_id))]
    async fn query(
        &self,
        vector: &[f32],
        video_id: &str,
        top_k: usize,
    ) -> Result<Vec<QueryMatch>> {
        check_dimensions(self.dimensions, vector.len())?;

        let body = QueryRequest {
            vector,
            top_k,
            namespace: &self.namespace,
            filter: serde_json::json!({ "videoId": { "$eq": video_id } }),
            include_metadata: true,
        };

        let response = self
            .http
            .post(self.api_url("query")?)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VidaskError::VectorStore(format!(
                "query failed with {}: {}",
                status, text
            )));
        }

        let payload: QueryResponse = response.json().await?;

        let matches = payload
            .matches
            .into_iter()
            .map(|m| QueryMatch {
                id: m.id,
                score: m.score,
                metadata: m.metadata,
            })
            .collect();

        Ok(matches)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
    namespace: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    namespace: &'a str,
    filter: serde_json::Value,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<MatchPayload>,
}

#[derive(Deserialize)]
struct MatchPayload {
    id: String,
    score: f32,
    metadata: RecordMetadata,
}
