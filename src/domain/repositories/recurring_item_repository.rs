use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::RecurringItem;
use crate::domain::repositories::error::Result;

#[async_trait]
pub trait RecurringItemRepository: Send + Sync {
    async fn get(&self, item_id: u64) -> Result<Option<RecurringItem>>;

    /// Insert a new item; the repository assigns and returns its ID
    async fn insert(&self, item: &RecurringItem) -> Result<u64>;

    async fn list_for_user(&self, user_id: u64) -> Result<Vec<RecurringItem>>;

    /// Persist a completed item together with its successor, if any.
    ///
    /// Both writes commit or neither does. Returns the successor's new ID.
    async fn complete_with_successor(
        &self,
        completed: &RecurringItem,
        successor: Option<&RecurringItem>,
    ) -> Result<Option<u64>>;

    /// Delete completed todos whose completion time precedes `cutoff`.
    /// Tasks are kept: time blocks of retained plans still point at them.
    async fn delete_completed_todos_before(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}
