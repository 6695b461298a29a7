//! Conversation history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many trailing turns ground each prompt. Older turns fall out of the
/// window; the itinerary snapshot, not the transcript, is the source of truth.
pub const HISTORY_WINDOW: usize = 10;

/// Speaker role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One turn of the conversation, kept by the session for grounding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// Create a user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into(), timestamp: Utc::now() }
    }

    /// Create an assistant turn
    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, text: text.into(), timestamp: Utc::now() }
    }
}

/// The trailing [`HISTORY_WINDOW`] turns of `history`
pub fn recent_turns(history: &[ConversationTurn]) -> &[ConversationTurn] {
    &history[history.len().saturating_sub(HISTORY_WINDOW)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_constructors() {
        let turn = ConversationTurn::user("add a museum");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.text, "add a museum");

        let turn = ConversationTurn::assistant("Done!");
        assert_eq!(turn.role, Role::Assistant);
    }

    #[test]
    fn test_recent_turns_window() {
        let history: Vec<ConversationTurn> =
            (0..15).map(|i| ConversationTurn::user(format!("turn {i}"))).collect();

        let recent = recent_turns(&history);
        assert_eq!(recent.len(), HISTORY_WINDOW);
        assert_eq!(recent[0].text, "turn 5");
        assert_eq!(recent.last().unwrap().text, "turn 14");
    }

    #[test]
    fn test_recent_turns_short_history() {
        let history = vec![ConversationTurn::user("hello")];
        assert_eq!(recent_turns(&history).len(), 1);
        assert!(recent_turns(&[]).is_empty());
    }
}
