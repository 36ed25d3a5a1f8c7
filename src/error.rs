//! Error types for Vidask.

use thiserror::Error;

/// Library-level error type for Vidask operations.
#[derive(Error, Debug)]
pub enum VidaskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Transcript fetch failed: {0}")]
    Transcript(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Embedding batch {batch} failed after {embedded} texts were embedded: {message}")]
    EmbeddingBatch {
        batch: usize,
        embedded: usize,
        message: String,
    },

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Upsert batch {batch} failed, {upserted} records already written: {message}")]
    UpsertBatch {
        batch: usize,
        upserted: usize,
        message: String,
    },

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Completion generation failed: {0}")]
    Completion(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Vidask operations.
pub type Result<T> = std::result::Result<T, VidaskError>;
