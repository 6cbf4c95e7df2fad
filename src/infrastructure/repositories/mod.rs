pub mod sqlite_category_repository;
pub mod sqlite_item_repository;
pub mod sqlite_plan_repository;
pub mod sqlite_user_preferences_repository;

pub use sqlite_category_repository::SqliteCategoryRepository;
pub use sqlite_item_repository::SqliteItemRepository;
pub use sqlite_plan_repository::SqlitePlanRepository;
pub use sqlite_user_preferences_repository::SqliteUserPreferencesRepository;
