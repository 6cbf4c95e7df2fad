use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{
    ItemService, PlanService, PreferencesService, WorkHourService, WorkHourStats,
};
use crate::domain::clock::Clock;
use crate::domain::repositories::{
    CategoryRepository, DailyPlanRepository, RecurringItemRepository, UserPreferencesRepository,
};
use crate::infrastructure::cache::TtlCache;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::DatabaseManager;
use crate::infrastructure::repositories::{
    SqliteCategoryRepository, SqliteItemRepository, SqlitePlanRepository,
    SqliteUserPreferencesRepository,
};

/// Everything the binary (or a test) needs, wired over one database.
#[derive(Clone)]
pub struct Services {
    pub categories: Arc<dyn CategoryRepository>,
    pub preferences: Arc<PreferencesService>,
    pub items: Arc<ItemService>,
    pub work_hours: Arc<WorkHourService>,
    pub plans: Arc<PlanService>,
}

/// Builds the services over SQLite repositories.
pub fn initialize_services(
    config: &AppConfig,
    db: &DatabaseManager,
    clock: Arc<dyn Clock>,
) -> Services {
    let item_repo: Arc<dyn RecurringItemRepository> =
        Arc::new(SqliteItemRepository::new(db.clone()));
    initialize_services_with(config, db, item_repo, clock)
}

/// Same as `initialize_services` but with a caller-supplied item repository.
pub fn initialize_services_with(
    config: &AppConfig,
    db: &DatabaseManager,
    item_repo: Arc<dyn RecurringItemRepository>,
    clock: Arc<dyn Clock>,
) -> Services {
    let plan_repo: Arc<dyn DailyPlanRepository> = Arc::new(SqlitePlanRepository::new(db.clone()));
    let prefs_repo: Arc<dyn UserPreferencesRepository> =
        Arc::new(SqliteUserPreferencesRepository::new(db.clone()));
    let categories: Arc<dyn CategoryRepository> =
        Arc::new(SqliteCategoryRepository::new(db.clone()));

    let preferences = Arc::new(PreferencesService::new(
        prefs_repo,
        clock.clone(),
        config.default_goals(),
        &config.default_timezone,
    ));

    let cache: TtlCache<WorkHourStats> =
        TtlCache::new(Duration::from_secs(config.cache_ttl_secs));
    let work_hours = Arc::new(WorkHourService::new(
        plan_repo.clone(),
        preferences.clone(),
        cache,
        config.cache_key_prefix.clone(),
    ));

    let items = Arc::new(ItemService::new(
        item_repo.clone(),
        preferences.clone(),
        clock.clone(),
    ));
    let plans = Arc::new(PlanService::new(
        plan_repo,
        item_repo,
        work_hours.clone(),
        clock,
    ));

    Services {
        categories,
        preferences,
        items,
        work_hours,
        plans,
    }
}
