//! OpenAI client configuration with sensible defaults.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Create an OpenAI client with configured timeout.
///
/// When `api_key` is `None` the key is taken from the `OPENAI_API_KEY`
/// environment variable.
pub fn create_client(api_key: Option<&str>) -> Client<OpenAIConfig> {
    create_client_with_timeout(api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client with a custom timeout.
pub fn create_client_with_timeout(
    api_key: Option<&str>,
    timeout: Duration,
) -> Client<OpenAIConfig> {
    let config = match api_key {
        Some(key) => OpenAIConfig::new().with_api_key(key),
        None => OpenAIConfig::default(),
    };

    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(config).with_http_client(http_client)
}
