use async_trait::async_trait;

use crate::domain::entities::user_preferences::UserPreferences;
use crate::domain::repositories::error::Result;

/// Storage for per-user timezone and work-hour goals.
#[async_trait]
pub trait UserPreferencesRepository: Send + Sync {
    async fn get(&self, user_id: u64) -> Result<Option<UserPreferences>>;

    /// Insert or overwrite; `created_at` of an existing row is kept.
    /// Rejects preferences that fail `is_valid`.
    async fn save(&self, preferences: &UserPreferences) -> Result<()>;

    /// `NotFound` when the user has nothing stored
    async fn delete(&self, user_id: u64) -> Result<()>;

    async fn exists(&self, user_id: u64) -> Result<bool> {
        Ok(self.get(user_id).await?.is_some())
    }
}
