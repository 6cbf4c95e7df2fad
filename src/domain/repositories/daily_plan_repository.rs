use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::domain::entities::{BlockSnapshot, DailyPlan};
use crate::domain::repositories::error::Result;
use crate::domain::value_objects::DateRange;

#[async_trait]
pub trait DailyPlanRepository: Send + Sync {
    async fn get_plan(&self, user_id: u64, date: NaiveDate) -> Result<Option<DailyPlan>>;

    /// Upsert the plan for (user_id, date).
    ///
    /// Time blocks and priorities are replaced wholesale: whatever the plan
    /// held before is deleted and the submitted sets are inserted in the same
    /// transaction. Returns the plan ID.
    async fn save_plan(&self, plan: &DailyPlan) -> Result<u64>;

    /// Every block in range, joined with its task and category
    async fn load_blocks(&self, user_id: u64, range: DateRange) -> Result<Vec<BlockSnapshot>>;

    /// PTO hours recorded on plans in range, keyed by plan date
    async fn load_pto(&self, user_id: u64, range: DateRange) -> Result<BTreeMap<NaiveDate, f64>>;

    /// Delete plans dated before `cutoff` along with their blocks and priorities
    async fn delete_plans_before(&self, cutoff: NaiveDate) -> Result<usize>;
}
