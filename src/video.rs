//! Video reference parsing.
//!
//! Extracts the external video identifier from common URL shapes or a bare id.

use crate::error::{Result, VidaskError};
use regex::Regex;
use std::sync::OnceLock;

static VIDEO_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn video_id_regex() -> &'static Regex {
    VIDEO_ID_REGEX.get_or_init(|| {
        // Matches various YouTube URL formats and bare video IDs. The host
        // must sit at the start of the input, after a scheme's `//`, or after
        // a subdomain dot, so lookalike hosts don't match.
        Regex::new(
            r"(?x)
            (?:
                # Full YouTube URLs
                (?:^|//|\.)
                (?:https?://)?
                (?:www\.)?
                (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            # Bare video ID (11 characters)
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex")
    })
}

/// Extract the video identifier from a URL or bare id.
pub fn extract_video_id(input: &str) -> Result<String> {
    let caps = video_id_regex()
        .captures(input.trim())
        .ok_or_else(|| VidaskError::InvalidInput(format!("Could not parse video reference: {}", input)))?;

    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| VidaskError::InvalidInput(format!("Could not parse video reference: {}", input)))
}

/// Canonical watch URL for a video id, stored as `sourceUrl` metadata.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
