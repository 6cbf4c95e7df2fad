pub mod item_service;
pub mod plan_service;
pub mod preferences_service;
pub mod recurrence_engine;
pub mod rollup_engine;
pub mod work_hour_service;

pub use item_service::{Completion, ItemAnalytics, ItemService};
pub use plan_service::{CleanupReport, PlanService, PlanSubmission};
pub use preferences_service::PreferencesService;
pub use rollup_engine::{BLOCK_MINUTES, RollupResult, rollup};
pub use work_hour_service::{WorkHourService, WorkHourStats};
