//! Configuration module for Vidask.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnswerPrompts, Prompts};
pub use settings::{
    CompletionSettings, EmbeddingSettings, GeneralSettings, PromptSettings, SegmenterSettings,
    Settings, TranscriptSettings, VectorStoreSettings,
};
