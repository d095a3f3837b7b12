// Persistence contract for messages
// `Database` implements it over PostgreSQL, `MemoryStore` keeps rows in process.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::{error::ApiResult, models::Message};

/// The storage operations the message service needs.
///
/// Implementations own id assignment and timestamps, and must make each
/// single-row write atomic. Concurrent updates to one row are last-write-wins.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert a row and return it with its assigned id and timestamps.
    async fn insert(&self, content: &str, is_palindrome: bool) -> ApiResult<Message>;

    async fn find(&self, id: i64) -> ApiResult<Option<Message>>;

    /// Replace content and the derived flag, refreshing `updated_at`.
    /// Returns `None` when no row has this id.
    async fn update_content(
        &self,
        id: i64,
        content: &str,
        is_palindrome: bool,
    ) -> ApiResult<Option<Message>>;

    /// Returns `true` when a row was removed.
    async fn delete(&self, id: i64) -> ApiResult<bool>;

    /// Rows ordered by ascending id.
    async fn list(&self, limit: i64, offset: i64) -> ApiResult<Vec<Message>>;

    async fn count(&self) -> ApiResult<i64>;

    /// Cheap liveness probe for readiness checks.
    async fn ping(&self) -> ApiResult<()>;
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    rows: BTreeMap<i64, Message>,
}

/// In-process store. Ids come from a counter and are never reused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert(&self, content: &str, is_palindrome: bool) -> ApiResult<Message> {
        let mut state = self.state.write().await;
        state.next_id += 1;

        let now = Utc::now();
        let message = Message {
            id: state.next_id,
            content: content.to_string(),
            is_palindrome,
            created_at: now,
            updated_at: now,
        };

        state.rows.insert(message.id, message.clone());
        Ok(message)
    }

    async fn find(&self, id: i64) -> ApiResult<Option<Message>> {
        let state = self.state.read().await;
        Ok(state.rows.get(&id).cloned())
    }

    async fn update_content(
        &self,
        id: i64,
        content: &str,
        is_palindrome: bool,
    ) -> ApiResult<Option<Message>> {
        let mut state = self.state.write().await;

        Ok(state.rows.get_mut(&id).map(|message| {
            message.content = content.to_string();
            message.is_palindrome = is_palindrome;
            message.updated_at = Utc::now();
            message.clone()
        }))
    }

    async fn delete(&self, id: i64) -> ApiResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.rows.remove(&id).is_some())
    }

    async fn list(&self, limit: i64, offset: i64) -> ApiResult<Vec<Message>> {
        let state = self.state.read().await;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(0);

        Ok(state.rows.values().skip(skip).take(take).cloned().collect())
    }

    async fn count(&self) -> ApiResult<i64> {
        let state = self.state.read().await;
        Ok(state.rows.len() as i64)
    }

    async fn ping(&self) -> ApiResult<()> {
        Ok(())
    }
}
