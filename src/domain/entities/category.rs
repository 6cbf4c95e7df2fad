use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WORK_COLOR: &str = "#007bff";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub color: String,
}

impl Category {
    pub fn new(user_id: u64, name: String, color: String) -> Self {
        Self {
            id: 0,
            user_id,
            name,
            color,
        }
    }

    /// "Work" (any case) or its legacy alias "APS"
    pub fn is_work(&self) -> bool {
        is_work_name(&self.name)
    }
}

pub fn is_work_name(name: &str) -> bool {
    let name = name.trim();
    name.eq_ignore_ascii_case("work") || name.eq_ignore_ascii_case("aps")
}

/// Task as seen by the rollup: already joined with its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: u64,
    pub title: String,
    pub category: Category,
}

/// One scheduled block together with the date of the plan that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub completed: bool,
    pub task: Option<TaskSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_matching_covers_alias_and_case() {
        for name in ["Work", "WORK", " work ", "APS", "aps"] {
            assert!(is_work_name(name), "{name} should count as work");
        }
        for name in ["Workout", "Personal", "Church", ""] {
            assert!(!is_work_name(name), "{name} should not count as work");
        }
    }
}
