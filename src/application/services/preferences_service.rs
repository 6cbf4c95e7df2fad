use chrono::NaiveDate;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::warn;

use crate::application::error::{Result, ServiceError};
use crate::domain::clock::Clock;
use crate::domain::entities::{UserPreferences, WorkHourGoals};
use crate::domain::repositories::UserPreferencesRepository;

/// Per-user timezone and work-hour goals, with configured fallbacks.
pub struct PreferencesService {
    user_prefs_repo: Arc<dyn UserPreferencesRepository>,
    clock: Arc<dyn Clock>,
    default_goals: WorkHourGoals,
    default_timezone: Tz,
}

impl PreferencesService {
    pub fn new(
        user_prefs_repo: Arc<dyn UserPreferencesRepository>,
        clock: Arc<dyn Clock>,
        default_goals: WorkHourGoals,
        default_timezone: &str,
    ) -> Self {
        let default_timezone = default_timezone.parse().unwrap_or_else(|_| {
            warn!("Invalid default timezone {:?}, using UTC", default_timezone);
            Tz::UTC
        });
        Self {
            user_prefs_repo,
            clock,
            default_goals,
            default_timezone,
        }
    }

    /// Set the time zone for a user
    pub async fn set_user_timezone(&self, user_id: u64, timezone_str: &str) -> Result<()> {
        if timezone_str.parse::<Tz>().is_err() {
            return Err(ServiceError::Validation(format!(
                "Invalid timezone: {timezone_str}"
            )));
        }

        let now = self.clock.now();
        let preferences = match self.user_prefs_repo.get(user_id).await? {
            Some(mut prefs) => {
                prefs.update_timezone(timezone_str.to_string(), now);
                prefs
            }
            None => self.fresh_preferences(user_id, timezone_str.to_string()),
        };

        self.user_prefs_repo.save(&preferences).await?;
        Ok(())
    }

    /// Store weekly/monthly work-hour goals for a user
    pub async fn set_goals(&self, user_id: u64, goals: WorkHourGoals) -> Result<()> {
        for hours in [goals.weekly_hours, goals.monthly_hours] {
            if !hours.is_finite() || hours <= 0.0 {
                return Err(ServiceError::Validation(format!(
                    "Work-hour goals must be positive, got {hours}"
                )));
            }
        }

        let now = self.clock.now();
        let mut preferences = match self.user_prefs_repo.get(user_id).await? {
            Some(prefs) => prefs,
            None => self.fresh_preferences(user_id, self.default_timezone.name().to_string()),
        };
        preferences.update_goals(goals, now);

        self.user_prefs_repo.save(&preferences).await?;
        Ok(())
    }

    /// Goals for the user, or the configured defaults when none are stored
    pub async fn goals_for(&self, user_id: u64) -> Result<WorkHourGoals> {
        Ok(self
            .user_prefs_repo
            .get(user_id)
            .await?
            .map_or(self.default_goals, |prefs| prefs.goals()))
    }

    pub async fn timezone_for(&self, user_id: u64) -> Result<Tz> {
        let Some(prefs) = self.user_prefs_repo.get(user_id).await? else {
            return Ok(self.default_timezone);
        };
        Ok(prefs.timezone.parse().unwrap_or_else(|_| {
            warn!(
                "User {} has unparseable timezone {:?}, falling back to {}",
                user_id, prefs.timezone, self.default_timezone
            );
            self.default_timezone
        }))
    }

    /// Today's calendar date in the user's timezone
    pub async fn local_today(&self, user_id: u64) -> Result<NaiveDate> {
        let tz = self.timezone_for(user_id).await?;
        Ok(self.clock.now().with_timezone(&tz).date_naive())
    }

    fn fresh_preferences(&self, user_id: u64, timezone: String) -> UserPreferences {
        let mut prefs = UserPreferences::new(user_id, timezone, self.clock.now());
        prefs.weekly_goal_hours = self.default_goals.weekly_hours;
        prefs.monthly_goal_hours = self.default_goals.monthly_hours;
        prefs
    }
}
