//! Chat message types and chat-log naming.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// File used when a username has no characters allowed in a file name.
pub const ANONYMOUS_LOG_STEM: &str = "anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One entry in a user's chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub who: Sender,
    pub text: String,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::now(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::now(Sender::Bot, text)
    }

    fn now(who: Sender, text: impl Into<String>) -> Self {
        Self {
            who,
            text: text.into(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// File name holding a user's chat history.
///
/// Keeps ASCII alphanumerics, `_` and `-`, lower-cases the result and adds
/// a `.json` extension. Distinct usernames can map to the same file
/// (`Alice` and `alice`, `a.b` and `ab`).
pub fn log_file_name(username: &str) -> String {
    let stem: String = username
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if stem.is_empty() {
        format!("{ANONYMOUS_LOG_STEM}.json")
    } else {
        format!("{stem}.json")
    }
}
