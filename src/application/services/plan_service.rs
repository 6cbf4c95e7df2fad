use chrono::{Days, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::application::error::{Result, ServiceError};
use crate::application::services::rollup_engine::BLOCK_MINUTES;
use crate::application::services::work_hour_service::WorkHourService;
use crate::domain::clock::Clock;
use crate::domain::entities::{DailyPlan, Priority, TimeBlock, merge_priorities};
use crate::domain::repositories::{DailyPlanRepository, RecurringItemRepository};

pub const MAX_PTO_HOURS: f64 = 24.0;

/// What a client submits when saving a day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanSubmission {
    pub productivity_rating: Option<u8>,
    pub brain_dump: Option<String>,
    pub pto_hours: Option<f64>,
    pub time_blocks: Vec<TimeBlock>,
    pub priorities: Vec<Priority>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub cutoff: NaiveDate,
    pub plans_deleted: usize,
    pub items_deleted: usize,
}

#[derive(Clone)]
pub struct PlanService {
    plan_repo: Arc<dyn DailyPlanRepository>,
    item_repo: Arc<dyn RecurringItemRepository>,
    work_hours: Arc<WorkHourService>,
    clock: Arc<dyn Clock>,
}

impl PlanService {
    pub fn new(
        plan_repo: Arc<dyn DailyPlanRepository>,
        item_repo: Arc<dyn RecurringItemRepository>,
        work_hours: Arc<WorkHourService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            plan_repo,
            item_repo,
            work_hours,
            clock,
        }
    }

    pub async fn get_plan(&self, user_id: u64, date: NaiveDate) -> Result<Option<DailyPlan>> {
        Ok(self.plan_repo.get_plan(user_id, date).await?)
    }

    /// Saves the plan for (user, date), replacing its blocks and priorities.
    pub async fn save_plan(
        &self,
        user_id: u64,
        date: NaiveDate,
        submission: PlanSubmission,
    ) -> Result<u64> {
        validate_submission(&submission)?;

        let existing_id = self
            .plan_repo
            .get_plan(user_id, date)
            .await?
            .map_or(0, |plan| plan.id);

        let mut time_blocks = submission.time_blocks;
        time_blocks.sort_by_key(|block| block.start_time);

        let plan = DailyPlan {
            id: existing_id,
            user_id,
            date,
            productivity_rating: submission.productivity_rating,
            brain_dump: submission.brain_dump,
            pto_hours: submission.pto_hours.filter(|hours| *hours > 0.0),
            time_blocks,
            priorities: merge_priorities(&[], &submission.priorities),
        };

        let id = self.plan_repo.save_plan(&plan).await?;
        self.work_hours.invalidate_user(user_id).await;

        info!(
            "Saved plan #{} for user {} on {} ({} blocks, {} priorities)",
            id,
            user_id,
            date,
            plan.time_blocks.len(),
            plan.priorities.len()
        );
        Ok(id)
    }

    /// Copies unfinished priorities of `from` into the plan of `to`, skipping
    /// any whose content is already there. Returns how many were added.
    pub async fn carry_over_priorities(
        &self,
        user_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<usize> {
        let Some(source) = self.plan_repo.get_plan(user_id, from).await? else {
            return Ok(0);
        };

        let mut target = self
            .plan_repo
            .get_plan(user_id, to)
            .await?
            .unwrap_or_else(|| DailyPlan::new(user_id, to));

        let before = target.priorities.len();
        target.priorities = merge_priorities(&target.priorities, &source.incomplete_priorities());
        let added = target.priorities.len().saturating_sub(before);

        if added > 0 {
            self.plan_repo.save_plan(&target).await?;
            self.work_hours.invalidate_user(user_id).await;
            info!(
                "Carried {} priorities for user {} from {} to {}",
                added, user_id, from, to
            );
        }
        Ok(added)
    }

    /// Deletes plans older than `retention_days` and todos completed before then.
    pub async fn cleanup_old_data(&self, retention_days: u32) -> Result<CleanupReport> {
        let now = self.clock.now();
        let cutoff = now
            .date_naive()
            .checked_sub_days(Days::new(u64::from(retention_days)))
            .unwrap_or(NaiveDate::MIN);
        let cutoff_instant = cutoff.and_time(chrono::NaiveTime::MIN).and_utc();

        let plans_deleted = self.plan_repo.delete_plans_before(cutoff).await?;
        let items_deleted = self
            .item_repo
            .delete_completed_todos_before(cutoff_instant)
            .await?;
        self.work_hours.invalidate_all().await;

        info!(
            "Cleaned up data older than {} days: {} plans, {} completed todos",
            retention_days, plans_deleted, items_deleted
        );
        Ok(CleanupReport {
            cutoff,
            plans_deleted,
            items_deleted,
        })
    }
}

fn validate_submission(submission: &PlanSubmission) -> Result<()> {
    if let Some(rating) = submission.productivity_rating {
        if !(1..=5).contains(&rating) {
            return Err(ServiceError::Validation(format!(
                "Productivity rating must be between 1 and 5, got {rating}"
            )));
        }
    }

    if let Some(hours) = submission.pto_hours {
        if !hours.is_finite() || !(0.0..=MAX_PTO_HOURS).contains(&hours) {
            return Err(ServiceError::Validation(format!(
                "PTO hours must be between 0 and {MAX_PTO_HOURS}, got {hours}"
            )));
        }
    }

    for block in &submission.time_blocks {
        // 23:45-00:00 ends on the next day's midnight
        let (slot_end, _) = block
            .start_time
            .overflowing_add_signed(Duration::minutes(BLOCK_MINUTES as i64));
        if block.end_time <= block.start_time && block.end_time != slot_end {
            return Err(ServiceError::Validation(format!(
                "Time block starting at {} must end after it starts",
                block.start_time.format("%H:%M")
            )));
        }
    }

    Ok(())
}
