use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pagination::PaginationMeta;

/// Maximum message length, counted in Unicode scalar values
pub const MAX_CONTENT_CHARS: usize = 1000;

/// A stored message.
/// `is_palindrome` is always derived from `content` and never taken from a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub content: String,
    pub is_palindrome: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /messages`.
/// Extra fields such as `id` or `isPalindrome` are ignored; both are assigned server-side.
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub content: String,
}

/// Body of `PATCH /messages/:id`.
/// An absent or null `content` leaves the message untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateMessageRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// Response of `GET /messages`
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub messages: Vec<Message>,
    pub pagination: PaginationMeta,
}

impl CreateMessageRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_content(&self.content)
    }
}

impl UpdateMessageRequest {
    pub fn validate(&self) -> Result<(), String> {
        match self.content {
            Some(ref content) => validate_content(content),
            None => Ok(()),
        }
    }
}

/// Enforce the length bound on message content
pub fn validate_content(content: &str) -> Result<(), String> {
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(format!(
            "Message content exceeds {} characters",
            MAX_CONTENT_CHARS
        ));
    }
    Ok(())
}

/// Parse a path segment into a message id. Only positive integers are valid.
pub fn parse_message_id(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| "Invalid message ID".to_string())
}
