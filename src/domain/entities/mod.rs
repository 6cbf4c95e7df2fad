pub mod category;
pub mod daily_plan;
pub mod recurring_item;
pub mod user_preferences;

pub use category::{BlockSnapshot, Category, TaskSnapshot};
pub use daily_plan::{DailyPlan, Priority, TimeBlock, merge_priorities};
pub use recurring_item::{ItemKind, ItemPriority, RecurringItem};
pub use user_preferences::{UserPreferences, WorkHourGoals};
