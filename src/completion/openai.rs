//! OpenAI chat completion implementation.

use super::{format_matches, CompletionClient};
use crate::config::Prompts;
use crate::error::{Result, VidaskError};
use crate::openai::create_client;
use crate::vector_store::QueryMatch;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// OpenAI-backed completion client.
pub struct OpenAICompletion {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    prompts: Prompts,
}

impl OpenAICompletion {
    /// Create a new completion client with default settings.
    pub fn new() -> Self {
        Self::with_config("gpt-4o-mini", None)
    }

    /// Create a new completion client with a custom model.
    pub fn with_config(model: &str, api_key: Option<&str>) -> Self {
        Self {
            client: create_client(api_key),
            model: model.to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            prompts: Prompts::default(),
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output length bound.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set custom prompts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }
}

impl Default for OpenAICompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for OpenAICompletion {
    #[instrument(skip(self, question, matches), fields(matches = matches.len()))]
    async fn complete(&self, question: &str, matches: &[QueryMatch]) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), format_matches(matches));

        let user_prompt = self.prompts.render(&self.prompts.answer.user, &vars);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.prompts.answer.system.clone())
                .build()
                .map_err(|e| VidaskError::Completion(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| VidaskError::Completion(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| VidaskError::Completion(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| VidaskError::OpenAI(format!("Failed to generate answer: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| VidaskError::Completion("Empty response from LLM".to_string()))?
            .clone();

        debug!("Generated answer from {} matches", matches.len());

        Ok(answer)
    }
}
