pub mod clock;
pub mod entities;
pub mod repositories;
pub mod value_objects;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entities::{
    BlockSnapshot, Category, DailyPlan, ItemKind, ItemPriority, Priority, RecurringItem,
    TaskSnapshot, TimeBlock, UserPreferences, WorkHourGoals,
};
pub use repositories::{
    CategoryRepository, DailyPlanRepository, RecurringItemRepository, RepositoryError,
    UserPreferencesRepository,
};
pub use value_objects::{DateRange, RecurrenceRule};
