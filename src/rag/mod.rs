//! Retrieval-augmented answering over ingested video transcripts.

mod engine;

pub use engine::AnswerEngine;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One exchange in the conversation presented to the user.
///
/// The sequence is append-only: the caller appends one user turn per
/// submitted question and the answer engine produces exactly one assistant
/// turn per completed query (an apology turn on failure).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// Create a user turn stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant turn stamped with the current time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_constructors() {
        let user = ConversationTurn::user("What is this about?");
        assert_eq!(user.role, Role::User);

        let assistant = ConversationTurn::assistant("It covers...");
        assert_eq!(assistant.role, Role::Assistant);
        assert!(assistant.timestamp >= user.timestamp);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            "\"assistant\""
        );
    }
}
