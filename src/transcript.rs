//! Transcript retrieval client.
//!
//! Fetches plain-text captions for a video id from an HTTP transcript
//! endpoint. The endpoint is an external collaborator: `GET <base>/<videoId>`
//! returns the transcript body, or an error status when the video has no
//! transcript or the id is invalid.

use crate::error::{Result, VidaskError};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// HTTP client for the transcript source.
pub struct TranscriptClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TranscriptClient {
    /// Create a new transcript client.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| VidaskError::Config(format!("Invalid transcript endpoint: {}", e)))?;

        // A trailing slash is required for Url::join to append the video id.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url })
    }

    /// Fetch the plain-text transcript for a video.
    #[instrument(skip(self), fields(video_id = %video_id))]
    pub async fn fetch(&self, video_id: &str) -> Result<String> {
        let url = self
            .base_url
            .join(video_id)
            .map_err(|e| VidaskError::Config(format!("Invalid transcript URL: {}", e)))?;

        debug!("Fetching transcript from {}", url);

        let response = self.http.get(url).send().await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(VidaskError::InvalidInput(format!(
                    "No transcript available for video {}",
                    video_id
                )));
            }
            status => {
                let text = response.text().await.unwrap_or_default();
                return Err(VidaskError::Transcript(format!(
                    "transcript service returned {} for {}: {}",
                    status, video_id, text
                )));
            }
        }

        let body = response.text().await?;

        if body.trim().is_empty() {
            return Err(VidaskError::EmptyInput(format!(
                "Transcript for video {} is empty",
                video_id
            )));
        }

        Ok(body)
    }
}
