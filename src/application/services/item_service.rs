use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::application::error::{Result, ServiceError};
use crate::application::services::preferences_service::PreferencesService;
use crate::application::services::recurrence_engine;
use crate::domain::clock::Clock;
use crate::domain::entities::RecurringItem;
use crate::domain::repositories::RecurringItemRepository;

/// Outcome of completing an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub completed: RecurringItem,
    pub successor: Option<RecurringItem>,
}

/// Dashboard counters over a user's tasks and todos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAnalytics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub completion_rate: f64,
}

#[derive(Clone)]
pub struct ItemService {
    item_repo: Arc<dyn RecurringItemRepository>,
    preferences: Arc<PreferencesService>,
    clock: Arc<dyn Clock>,
}

impl ItemService {
    pub fn new(
        item_repo: Arc<dyn RecurringItemRepository>,
        preferences: Arc<PreferencesService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            item_repo,
            preferences,
            clock,
        }
    }

    // === CREATION ===

    pub async fn create_item(&self, mut item: RecurringItem) -> Result<u64> {
        if item.title.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Item title cannot be empty".to_string(),
            ));
        }

        if item.is_recurring && item.recurrence_rule.is_none() {
            return Err(ServiceError::Validation(
                "A recurring item needs a recurrence rule".to_string(),
            ));
        }

        item.id = 0;
        item.completed = false;
        item.completed_at = None;
        item.created_at = self.clock.now();

        let id = self.item_repo.insert(&item).await?;
        info!("Created {} #{} for user {}", item.kind.as_str(), id, item.user_id);
        Ok(id)
    }

    pub async fn list_items(&self, user_id: u64) -> Result<Vec<RecurringItem>> {
        Ok(self.item_repo.list_for_user(user_id).await?)
    }

    // === COMPLETION ===

    /// Completes an item owned by `user_id`, spawning the next occurrence when it recurs.
    ///
    /// Completion and successor are written in one repository call; if that
    /// fails neither is kept.
    pub async fn complete_item(&self, user_id: u64, item_id: u64) -> Result<Completion> {
        let mut item = self
            .item_repo
            .get(item_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Item #{item_id}")))?;

        if item.user_id != user_id {
            return Err(ServiceError::Forbidden(format!("item #{item_id}")));
        }

        if item.completed {
            return Err(ServiceError::Validation(format!(
                "Item #{item_id} is already completed"
            )));
        }

        let mut successor = recurrence_engine::complete_and_advance(&mut item, self.clock.now());

        let successor_id = self
            .item_repo
            .complete_with_successor(&item, successor.as_ref())
            .await?;

        if let (Some(next), Some(id)) = (successor.as_mut(), successor_id) {
            next.id = id;
            info!(
                "Item #{} completed, next occurrence #{} due {:?}",
                item.id, id, next.due_date
            );
        }

        Ok(Completion {
            completed: item,
            successor,
        })
    }

    // === ANALYTICS ===

    pub async fn analytics(&self, user_id: u64) -> Result<ItemAnalytics> {
        let today = self.preferences.local_today(user_id).await?;
        let items = self.item_repo.list_for_user(user_id).await?;

        let total = items.len();
        let completed = items.iter().filter(|item| item.completed).count();
        let overdue = items.iter().filter(|item| item.is_overdue(today)).count();
        let completion_rate = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };

        Ok(ItemAnalytics {
            total,
            completed,
            pending: total - completed,
            overdue,
            completion_rate,
        })
    }
}
