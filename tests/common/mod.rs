#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use timeblock_planner::domain::repositories::Result as RepoResult;
use timeblock_planner::domain::{
    Category, Clock, FixedClock, ItemKind, RecurringItem, RecurringItemRepository,
    RepositoryError, TimeBlock,
};
use timeblock_planner::infrastructure::repositories::SqliteItemRepository;
use timeblock_planner::infrastructure::service_initializer::initialize_services_with;
use timeblock_planner::infrastructure::{AppConfig, DatabaseManager, Services};

pub const USER: u64 = 42;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn instant(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

/// Consecutive 15-minute blocks linked to `task_id`, starting at `start`.
pub fn blocks(start: NaiveTime, count: u32, task_id: u64) -> Vec<TimeBlock> {
    (0..count)
        .map(|i| {
            let begin = start + chrono::Duration::minutes(i64::from(i) * 15);
            TimeBlock::new(begin, begin + chrono::Duration::minutes(15), Some(task_id))
        })
        .collect()
}

pub struct TestApp {
    pub db: DatabaseManager,
    pub clock: Arc<FixedClock>,
    pub services: Services,
    pub item_repo: Arc<FlakyItemRepository>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let db = DatabaseManager::in_memory().unwrap();
        db.initialize_database().await.unwrap();

        let clock = Arc::new(FixedClock::new(instant(2025, 3, 14, 12)));
        let item_repo = Arc::new(FlakyItemRepository::new(SqliteItemRepository::new(db.clone())));
        let services = initialize_services_with(&config, &db, item_repo.clone(), clock.clone());

        Self {
            db,
            clock,
            services,
            item_repo,
        }
    }

    pub async fn category(&self, name: &str, color: &str) -> u64 {
        self.services
            .categories
            .insert(&Category::new(USER, name.to_string(), color.to_string()))
            .await
            .unwrap()
    }

    pub async fn task(&self, title: &str, category_id: Option<u64>) -> u64 {
        let mut item = RecurringItem::new(
            USER,
            ItemKind::Task,
            title.to_string(),
            None,
            self.clock.now(),
        );
        item.category_id = category_id;
        self.services.items.create_item(item).await.unwrap()
    }
}

/// SQLite item repository whose completion write can be made to fail.
pub struct FlakyItemRepository {
    inner: SqliteItemRepository,
    fail_completion: AtomicBool,
}

impl FlakyItemRepository {
    pub fn new(inner: SqliteItemRepository) -> Self {
        Self {
            inner,
            fail_completion: AtomicBool::new(false),
        }
    }

    pub fn fail_next_completion(&self) {
        self.fail_completion.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecurringItemRepository for FlakyItemRepository {
    async fn get(&self, item_id: u64) -> RepoResult<Option<RecurringItem>> {
        self.inner.get(item_id).await
    }

    async fn insert(&self, item: &RecurringItem) -> RepoResult<u64> {
        self.inner.insert(item).await
    }

    async fn list_for_user(&self, user_id: u64) -> RepoResult<Vec<RecurringItem>> {
        self.inner.list_for_user(user_id).await
    }

    async fn complete_with_successor(
        &self,
        completed: &RecurringItem,
        successor: Option<&RecurringItem>,
    ) -> RepoResult<Option<u64>> {
        if self.fail_completion.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::StorageError("disk full".into()));
        }
        self.inner.complete_with_successor(completed, successor).await
    }

    async fn delete_completed_todos_before(&self, cutoff: DateTime<Utc>) -> RepoResult<usize> {
        self.inner.delete_completed_todos_before(cutoff).await
    }
}
