//! OpenAI embeddings implementation.

use super::Embedder;
use crate::error::{Result, VidaskError};
use crate::openai::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Default maximum texts per embedding request.
const DEFAULT_BATCH_SIZE: usize = 100;

/// OpenAI-based embedder.
///
/// Inputs are grouped into batches bounded by `batch_size`, submitted
/// sequentially, and the results concatenated in input order.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: usize,
    batch_size: usize,
}

impl OpenAIEmbedder {
    /// Create a new OpenAI embedder with default settings.
    pub fn new() -> Self {
        Self::with_config("text-embedding-3-small", 1536, None)
    }

    /// Create a new OpenAI embedder with custom model and dimensions.
    pub fn with_config(model: &str, dimensions: usize, api_key: Option<&str>) -> Self {
        Self {
            client: create_client(api_key),
            model: model.to_string(),
            dimensions,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the maximum number of texts per request.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

impl Default for OpenAIEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| VidaskError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut all_embeddings: Vec<Vec<f32>> = Vec::with_capacity(texts.len());

        for (batch_index, batch) in texts.chunks(self.batch_size).enumerate() {
            let input: Vec<String> = batch.to_vec();

            let request = CreateEmbeddingRequestArgs::default()
                .model(&self.model)
                .input(EmbeddingInput::StringArray(input))
                .dimensions(self.dimensions as u32)
                .build()
                .map_err(|e| VidaskError::Embedding(format!("Failed to build request: {}", e)))?;

            let response =
                self.client
                    .embeddings()
                    .create(request)
                    .await
                    .map_err(|e| VidaskError::EmbeddingBatch {
                        batch: batch_index,
                        embedded: all_embeddings.len(),
                        message: e.to_string(),
                    })?;

            if response.data.len() != batch.len() {
                return Err(VidaskError::EmbeddingBatch {
                    batch: batch_index,
                    embedded: all_embeddings.len(),
                    message: format!(
                        "provider returned {} embeddings for {} inputs",
                        response.data.len(),
                        batch.len()
                    ),
                });
            }

            // Sort by index to ensure correct order within the batch
            let mut embeddings: Vec<_> = response.data.into_iter().collect();
            embeddings.sort_by_key(|e| e.index);

            for embedding_data in embeddings {
                all_embeddings.push(embedding_data.embedding);
            }
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder = OpenAIEmbedder::new();
        assert_eq!(embedder.dimensions(), 1536);

        let embedder = OpenAIEmbedder::with_config("text-embedding-3-large", 3072, None);
        assert_eq!(embedder.dimensions(), 3072);
    }

    #[test]
    fn test_batch_size_floor() {
        let embedder = OpenAIEmbedder::new().with_batch_size(0);
        assert_eq!(embedder.batch_size, 1);
    }
}
