// Library root for the palindrome messages service

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod palindrome;
pub mod routes;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use db::Database;
pub use error::{ApiError, ApiResult};
pub use models::{CreateMessageRequest, Message, MessageListResponse, UpdateMessageRequest};
pub use service::MessageService;
pub use store::{MemoryStore, MessageStore};
