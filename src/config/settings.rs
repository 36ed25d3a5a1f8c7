//! Configuration settings for Vidask.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub transcript: TranscriptSettings,
    pub segmenter: SegmenterSettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
    pub completion: CompletionSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Transcript source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Base URL of the transcript endpoint; the video id is appended.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://captions.example.com/api/transcripts".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Transcript segmentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterSettings {
    /// Approximate maximum characters per chunk.
    pub target_size: usize,
    /// Characters repeated across chunk boundaries.
    pub overlap: usize,
}

impl Default for SegmenterSettings {
    fn default() -> Self {
        Self {
            target_size: 4000,
            overlap: 500,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions; must match the vector index.
    pub dimensions: u32,
    /// Chunks per embedding sub-batch during ingestion. Kept small because
    /// embedding-provider per-call limits are tighter than upsert limits.
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
            batch_size: 5,
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Vector index provider (remote, memory).
    pub provider: String,
    /// Base URL of the remote index.
    pub endpoint: String,
    /// API key for the remote index; falls back to `VECTOR_INDEX_API_KEY`.
    pub api_key: Option<String>,
    /// Logical namespace shared across all videos.
    pub namespace: String,
    /// Records per upsert batch.
    pub batch_size: usize,
    /// Matches returned per query.
    pub top_k: usize,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: "remote".to_string(),
            endpoint: "https://index.example.com".to_string(),
            api_key: None,
            namespace: "yt".to_string(),
            batch_size: 100,
            top_k: 5,
        }
    }
}

/// Answer synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    /// LLM model for answer generation.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Output length bound.
    pub max_tokens: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Path to a TOML file overriding the default prompts.
    pub custom_path: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::VidaskError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidask")
            .join("config.toml")
    }

    /// Resolve the vector index API key from settings or environment.
    pub fn vector_index_api_key(&self) -> Option<String> {
        self.vector_store
            .api_key
            .clone()
            .or_else(|| std::env::var("VECTOR_INDEX_API_KEY").ok())
    }

    /// Reject configurations the pipelines cannot run with.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.segmenter.target_size == 0 || self.segmenter.overlap >= self.segmenter.target_size
        {
            return Err(crate::error::VidaskError::InvalidConfiguration(format!(
                "segmenter overlap ({}) must be smaller than target_size ({})",
                self.segmenter.overlap, self.segmenter.target_size
            )));
        }
        if self.embedding.dimensions == 0 {
            return Err(crate::error::VidaskError::InvalidConfiguration(
                "embedding dimensions must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
