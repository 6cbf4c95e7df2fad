use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::application::error::Result;
use crate::application::services::preferences_service::PreferencesService;
use crate::application::services::rollup_engine::{self, RollupResult, minutes_to_hours};
use crate::domain::entities::WorkHourGoals;
use crate::domain::repositories::DailyPlanRepository;
use crate::domain::value_objects::DateRange;
use crate::infrastructure::cache::TtlCache;

pub const SEVEN_DAY_WINDOW: u32 = 7;
pub const THIRTY_DAY_WINDOW: u32 = 30;

/// Work-hour dashboard around one anchor date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkHourStats {
    pub anchor: NaiveDate,
    pub seven_day: DateRange,
    pub thirty_day: DateRange,
    pub work_week: DateRange,
    pub categories: Vec<CategoryHours>,
    pub seven_day_work_hours: f64,
    pub thirty_day_work_hours: f64,
    pub work_week_work_hours: f64,
    pub goals: WorkHourGoals,
    pub weekly_progress: f64,
    pub monthly_progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryHours {
    pub name: String,
    pub color: String,
    pub seven_day_hours: f64,
    pub thirty_day_hours: f64,
    pub work_week_hours: f64,
}

impl WorkHourStats {
    pub fn category(&self, name: &str) -> Option<&CategoryHours> {
        self.categories.iter().find(|c| c.name == name)
    }
}

pub struct WorkHourService {
    plan_repo: Arc<dyn DailyPlanRepository>,
    preferences: Arc<PreferencesService>,
    cache: TtlCache<WorkHourStats>,
    key_prefix: String,
}

impl WorkHourService {
    pub fn new(
        plan_repo: Arc<dyn DailyPlanRepository>,
        preferences: Arc<PreferencesService>,
        cache: TtlCache<WorkHourStats>,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            plan_repo,
            preferences,
            cache,
            key_prefix: key_prefix.into(),
        }
    }

    /// Rollup of everything the user logged in `range`, with their goals.
    pub async fn rollup_range(&self, user_id: u64, range: DateRange) -> Result<RollupResult> {
        let goals = self.preferences.goals_for(user_id).await?;
        let blocks = self.plan_repo.load_blocks(user_id, range).await?;
        let pto = self.plan_repo.load_pto(user_id, range).await?;

        Ok(rollup_engine::rollup(&blocks, range, &pto, &goals))
    }

    /// Seven-day, thirty-day and work-week totals around `anchor`
    /// (the user's local today when `None`).
    pub async fn work_hour_stats(
        &self,
        user_id: u64,
        anchor: Option<NaiveDate>,
    ) -> Result<WorkHourStats> {
        let anchor = match anchor {
            Some(date) => date,
            None => self.preferences.local_today(user_id).await?,
        };

        let key = self.cache_key(user_id, anchor);
        if let Some(stats) = self.cache.get(&key).await {
            debug!("Work-hour stats cache hit for {}", key);
            return Ok(stats);
        }
        debug!("Work-hour stats cache miss for {}", key);

        let stats = self.compute_stats(user_id, anchor).await?;
        self.cache.set(key, stats.clone()).await;
        Ok(stats)
    }

    /// Forget cached stats for a user; call after any plan change.
    pub async fn invalidate_user(&self, user_id: u64) {
        let removed = self.cache.delete_prefix(&self.user_prefix(user_id)).await;
        if removed > 0 {
            debug!("Invalidated {} cached stats entries for user {}", removed, user_id);
        }
    }

    /// Forget every cached entry; used after bulk deletes that span users.
    pub async fn invalidate_all(&self) {
        let removed = self.cache.delete_prefix(&self.key_prefix).await;
        if removed > 0 {
            debug!("Invalidated {} cached stats entries", removed);
        }
    }

    async fn compute_stats(&self, user_id: u64, anchor: NaiveDate) -> Result<WorkHourStats> {
        let goals = self.preferences.goals_for(user_id).await?;

        let seven_day = DateRange::trailing(anchor, SEVEN_DAY_WINDOW);
        let thirty_day = DateRange::trailing(anchor, THIRTY_DAY_WINDOW);
        let work_week = DateRange::work_week_of(anchor);
        let span = thirty_day.union(&work_week);

        let blocks = self.plan_repo.load_blocks(user_id, span).await?;
        let pto = self.plan_repo.load_pto(user_id, span).await?;

        let seven = rollup_engine::rollup(&blocks, seven_day, &pto, &goals);
        let thirty = rollup_engine::rollup(&blocks, thirty_day, &pto, &goals);
        let week = rollup_engine::rollup(&blocks, work_week, &pto, &goals);

        Ok(WorkHourStats {
            anchor,
            seven_day,
            thirty_day,
            work_week,
            categories: merge_category_hours(&seven, &thirty, &week),
            seven_day_work_hours: seven.work_hours(),
            thirty_day_work_hours: thirty.work_hours(),
            work_week_work_hours: week.work_hours(),
            goals,
            weekly_progress: seven.weekly_progress,
            monthly_progress: thirty.monthly_progress,
        })
    }

    fn user_prefix(&self, user_id: u64) -> String {
        format!("{}user_{}_", self.key_prefix, user_id)
    }

    fn cache_key(&self, user_id: u64, anchor: NaiveDate) -> String {
        format!("{}work_hours_{}", self.user_prefix(user_id), anchor)
    }
}

fn merge_category_hours(
    seven: &RollupResult,
    thirty: &RollupResult,
    week: &RollupResult,
) -> Vec<CategoryHours> {
    let hours_in = |result: &RollupResult, name: &str| {
        result
            .category(name)
            .map_or(0.0, |c| minutes_to_hours(c.total_minutes))
    };

    let mut merged: Vec<CategoryHours> = Vec::new();
    for category in thirty.categories.iter().chain(&week.categories) {
        if merged.iter().any(|c| c.name == category.name) {
            continue;
        }
        merged.push(CategoryHours {
            name: category.name.clone(),
            color: category.color.clone(),
            seven_day_hours: hours_in(seven, &category.name),
            thirty_day_hours: hours_in(thirty, &category.name),
            work_week_hours: hours_in(week, &category.name),
        });
    }
    merged
}
