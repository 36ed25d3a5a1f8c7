//! Transcript segmentation into overlapping chunks.
//!
//! Splits raw transcript text into bounded, overlapping chunks suitable for
//! embedding. Break points are chosen hierarchically: paragraph boundaries
//! first, then sentence ends, then word boundaries, with a hard character cut
//! as the last resort.

use crate::error::{Result, VidaskError};
use serde::{Deserialize, Serialize};

/// A contiguous span of transcript text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptChunk {
    /// Text content of the chunk.
    pub text: String,
    /// Zero-based position among chunks from one transcript.
    pub sequence_index: usize,
}

/// Configuration for the segmenter.
#[derive(Debug, Clone, Copy)]
pub struct SegmenterConfig {
    /// Approximate maximum characters per chunk.
    pub target_size: usize,
    /// Trailing characters of one chunk repeated at the start of the next.
    pub overlap: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            target_size: 4000,
            overlap: 500,
        }
    }
}

/// Split transcript text into overlapping chunks.
///
/// Each chunk after the first starts with the final `overlap` characters of
/// its predecessor, so local context survives chunk boundaries. Output order
/// equals left-to-right position in the source; `sequence_index` is assigned
/// `0..n-1` in that order.
pub fn segment(text: &str, config: &SegmenterConfig) -> Result<Vec<TranscriptChunk>> {
    if text.trim().is_empty() {
        return Err(VidaskError::EmptyInput(
            "transcript text is empty or whitespace-only".to_string(),
        ));
    }
    if config.target_size == 0 || config.overlap >= config.target_size {
        return Err(VidaskError::InvalidConfiguration(format!(
            "overlap ({}) must be smaller than target_size ({})",
            config.overlap, config.target_size
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();

    let mut chunks = Vec::new();
    let mut start = 0usize;

    loop {
        let window_end = (start + config.target_size).min(total);
        let cut = if window_end == total {
            total
        } else {
            // The cut must land past the overlap region or the next start
            // would not advance.
            find_cut(&chars, start + config.overlap + 1, window_end)
        };

        chunks.push(TranscriptChunk {
            text: chars[start..cut].iter().collect(),
            sequence_index: chunks.len(),
        });

        if cut == total {
            break;
        }
        start = cut - config.overlap;
    }

    Ok(chunks)
}

/// Find the best cut position in `[min_cut, max_cut]`, preferring paragraph
/// breaks, then sentence ends, then word boundaries.
fn find_cut(chars: &[char], min_cut: usize, max_cut: usize) -> usize {
    // Paragraph boundary: cut right after a blank line.
    for i in (min_cut..=max_cut).rev() {
        if i >= 2 && chars[i - 1] == '\n' && chars[i - 2] == '\n' {
            return i;
        }
    }

    // Sentence boundary: terminal punctuation followed by whitespace.
    for i in (min_cut..=max_cut).rev() {
        if matches!(chars[i - 1], '.' | '!' | '?') && i < chars.len() && chars[i].is_whitespace() {
            return i;
        }
    }

    // Word boundary.
    for i in (min_cut..=max_cut).rev() {
        if chars[i - 1].is_whitespace() {
            return i;
        }
    }

    // Hard character cut.
    max_cut
}
