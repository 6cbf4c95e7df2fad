use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WEEKLY_GOAL_HOURS: f64 = 32.0;
pub const DEFAULT_MONTHLY_GOAL_HOURS: f64 = 140.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    pub user_id: u64,
    pub timezone: String,
    pub weekly_goal_hours: f64,
    pub monthly_goal_hours: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Work-hour targets used for goal progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkHourGoals {
    pub weekly_hours: f64,
    pub monthly_hours: f64,
}

impl Default for WorkHourGoals {
    fn default() -> Self {
        Self {
            weekly_hours: DEFAULT_WEEKLY_GOAL_HOURS,
            monthly_hours: DEFAULT_MONTHLY_GOAL_HOURS,
        }
    }
}

impl UserPreferences {
    pub fn new(user_id: u64, timezone: String, now: DateTime<Utc>) -> Self {
        let goals = WorkHourGoals::default();
        Self {
            user_id,
            timezone,
            weekly_goal_hours: goals.weekly_hours,
            monthly_goal_hours: goals.monthly_hours,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_timezone(&mut self, new_timezone: String, now: DateTime<Utc>) {
        self.timezone = new_timezone;
        self.updated_at = now;
    }

    pub fn update_goals(&mut self, goals: WorkHourGoals, now: DateTime<Utc>) {
        self.weekly_goal_hours = goals.weekly_hours;
        self.monthly_goal_hours = goals.monthly_hours;
        self.updated_at = now;
    }

    pub fn goals(&self) -> WorkHourGoals {
        WorkHourGoals {
            weekly_hours: self.weekly_goal_hours,
            monthly_hours: self.monthly_goal_hours,
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.timezone.is_empty()
            && self.user_id > 0
            && self.weekly_goal_hours.is_finite()
            && self.weekly_goal_hours >= 0.0
            && self.monthly_goal_hours.is_finite()
            && self.monthly_goal_hours >= 0.0
    }
}

impl PartialEq for UserPreferences {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id
    }
}
