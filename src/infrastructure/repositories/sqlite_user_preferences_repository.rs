use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, params};

use crate::domain::entities::user_preferences::UserPreferences;
use crate::domain::repositories::{RepositoryError, Result, UserPreferencesRepository};
use crate::infrastructure::database::DatabaseManager;

pub struct SqliteUserPreferencesRepository {
    db: DatabaseManager,
}

impl SqliteUserPreferencesRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

fn timestamp_column(idx: usize, secs: i64) -> rusqlite::Result<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single().ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp {secs} out of range").into(),
        )
    })
}

#[async_trait]
impl UserPreferencesRepository for SqliteUserPreferencesRepository {
    async fn get(&self, user_id: u64) -> Result<Option<UserPreferences>> {
        let prefs = self
            .db
            .execute_blocking(move |conn| {
                conn.query_row(
                    "SELECT user_id, timezone, weekly_goal_hours, monthly_goal_hours,
                            created_at, updated_at
                     FROM user_preferences WHERE user_id = ?1",
                    params![user_id as i64],
                    |row| {
                        Ok(UserPreferences {
                            user_id: row.get::<_, i64>(0)? as u64,
                            timezone: row.get(1)?,
                            weekly_goal_hours: row.get(2)?,
                            monthly_goal_hours: row.get(3)?,
                            created_at: timestamp_column(4, row.get(4)?)?,
                            updated_at: timestamp_column(5, row.get(5)?)?,
                        })
                    },
                )
                .optional()
            })
            .await?;
        Ok(prefs)
    }

    async fn save(&self, preferences: &UserPreferences) -> Result<()> {
        if !preferences.is_valid() {
            return Err(RepositoryError::InvalidData(
                "Invalid user preferences".into(),
            ));
        }

        let prefs = preferences.clone();
        self.db
            .execute_blocking(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO user_preferences
                        (user_id, timezone, weekly_goal_hours, monthly_goal_hours, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(user_id) DO UPDATE SET
                        timezone = excluded.timezone,
                        weekly_goal_hours = excluded.weekly_goal_hours,
                        monthly_goal_hours = excluded.monthly_goal_hours,
                        updated_at = excluded.updated_at;
                    "#,
                    params![
                        prefs.user_id as i64,
                        prefs.timezone,
                        prefs.weekly_goal_hours,
                        prefs.monthly_goal_hours,
                        prefs.created_at.timestamp(),
                        prefs.updated_at.timestamp()
                    ],
                )
            })
            .await?;
        Ok(())
    }

    async fn delete(&self, user_id: u64) -> Result<()> {
        let affected = self
            .db
            .execute_blocking(move |conn| {
                conn.execute(
                    "DELETE FROM user_preferences WHERE user_id = ?1",
                    params![user_id as i64],
                )
            })
            .await?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
