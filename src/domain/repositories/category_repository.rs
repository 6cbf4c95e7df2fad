use async_trait::async_trait;

use crate::domain::entities::Category;
use crate::domain::repositories::error::Result;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category and return its new ID
    async fn insert(&self, category: &Category) -> Result<u64>;

    /// All categories owned by a user, in creation order
    async fn list_for_user(&self, user_id: u64) -> Result<Vec<Category>>;
}
