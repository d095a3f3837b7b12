// Message record manager
// Validates input, derives the palindrome flag and delegates rows to the store.

use std::sync::Arc;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    models::{CreateMessageRequest, Message, MessageListResponse, UpdateMessageRequest},
    palindrome::is_palindrome,
    pagination::PageRequest,
    store::MessageStore,
};

/// Stateless apart from the injected store, so one instance serves every request.
#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
}

impl MessageService {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, request: CreateMessageRequest) -> ApiResult<Message> {
        request.validate().map_err(ApiError::validation)?;

        let palindrome = is_palindrome(&request.content);
        let message = self.store.insert(&request.content, palindrome).await?;

        info!(id = message.id, is_palindrome = message.is_palindrome, "Created message");
        Ok(message)
    }

    pub async fn get(&self, id: i64) -> ApiResult<Message> {
        self.store
            .find(id)
            .await?
            .ok_or_else(|| ApiError::message_not_found(id))
    }

    /// Replace the content when one is given; otherwise return the row untouched.
    /// A missing id is reported before any problem with the new content.
    pub async fn update(&self, id: i64, request: UpdateMessageRequest) -> ApiResult<Message> {
        let existing = self.get(id).await?;

        request.validate().map_err(ApiError::validation)?;

        let Some(content) = request.content else {
            return Ok(existing);
        };

        let palindrome = is_palindrome(&content);
        let message = self
            .store
            .update_content(id, &content, palindrome)
            .await?
            .ok_or_else(|| ApiError::message_not_found(id))?;

        info!(id = message.id, is_palindrome = message.is_palindrome, "Updated message");
        Ok(message)
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        if !self.store.delete(id).await? {
            return Err(ApiError::message_not_found(id));
        }

        info!(id, "Deleted message");
        Ok(())
    }

    pub async fn list(&self, page: PageRequest) -> ApiResult<MessageListResponse> {
        let messages = self.store.list(page.limit(), page.offset()).await?;
        let total = self.store.count().await?;

        Ok(MessageListResponse {
            messages,
            pagination: page.meta(total),
        })
    }

    pub async fn ping(&self) -> ApiResult<()> {
        self.store.ping().await
    }
}
