use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::domain::entities::WorkHourGoals;
use crate::domain::entities::user_preferences::{
    DEFAULT_MONTHLY_GOAL_HOURS, DEFAULT_WEEKLY_GOAL_HOURS,
};

/// Names the JSON file to load before environment overrides are applied.
pub const CONFIG_PATH_VAR: &str = "TIMEBLOCK_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: String,
    pub log_level: String,
    pub retention_days: u32,
    pub cache_ttl_secs: u64,
    pub cache_key_prefix: String,
    pub default_weekly_goal_hours: f64,
    pub default_monthly_goal_hours: f64,
    pub default_timezone: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: "timeblock.db".to_string(),
            log_level: "info".to_string(),
            retention_days: 60,
            cache_ttl_secs: 300,
            cache_key_prefix: "timeblocker_".to_string(),
            default_weekly_goal_hours: DEFAULT_WEEKLY_GOAL_HOURS,
            default_monthly_goal_hours: DEFAULT_MONTHLY_GOAL_HOURS,
            default_timezone: "UTC".to_string(),
        }
    }
}

impl AppConfig {
    /// `.env`, then the optional JSON file, then process environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database_path = path;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(days) = lookup("RETENTION_DAYS") {
            self.retention_days = parse_number("RETENTION_DAYS", &days)?;
        }
        if let Some(ttl) = lookup("CACHE_TTL_SECS") {
            self.cache_ttl_secs = parse_number("CACHE_TTL_SECS", &ttl)?;
        }
        Ok(())
    }

    pub fn default_goals(&self) -> WorkHourGoals {
        WorkHourGoals {
            weekly_hours: self.default_weekly_goal_hours,
            monthly_hours: self.default_monthly_goal_hours,
        }
    }
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("{key} must be a non-negative integer, got {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.database_path, "timeblock.db");
        assert_eq!(config.retention_days, 60);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.cache_key_prefix, "timeblocker_");
        assert_eq!(config.default_goals(), WorkHourGoals::default());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "retention_days": 14, "default_timezone": "Europe/Madrid" }}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.retention_days, 14);
        assert_eq!(config.default_timezone, "Europe/Madrid");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn environment_overrides_win() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("DATABASE_PATH", "/tmp/plans.db"),
                ("RETENTION_DAYS", " 90 "),
                ("CACHE_TTL_SECS", "30"),
            ]))
            .unwrap();

        assert_eq!(config.database_path, "/tmp/plans.db");
        assert_eq!(config.retention_days, 90);
        assert_eq!(config.cache_ttl_secs, 30);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(lookup_from(&[("RETENTION_DAYS", "sixty")]))
            .unwrap_err();
        assert!(err.to_string().contains("RETENTION_DAYS"));

        assert!(
            AppConfig::default()
                .apply_overrides(lookup_from(&[("CACHE_TTL_SECS", "-5")]))
                .is_err()
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AppConfig::from_file("/definitely/not/here.json").is_err());
    }
}
