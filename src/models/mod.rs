// Models module

pub mod message;

// Re-export commonly used types
pub use message::{CreateMessageRequest, Message, MessageListResponse, UpdateMessageRequest};
