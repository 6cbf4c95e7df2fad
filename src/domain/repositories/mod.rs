pub mod category_repository;
pub mod daily_plan_repository;
pub mod error;
pub mod recurring_item_repository;
pub mod user_preferences_repository;

pub use category_repository::CategoryRepository;
pub use daily_plan_repository::DailyPlanRepository;
pub use error::{RepositoryError, Result};
pub use recurring_item_repository::RecurringItemRepository;
pub use user_preferences_repository::UserPreferencesRepository;
