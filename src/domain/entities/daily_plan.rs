use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything a user planned for one date. Unique per (user_id, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub id: u64,
    pub user_id: u64,
    pub date: NaiveDate,
    pub productivity_rating: Option<u8>,
    pub brain_dump: Option<String>,
    pub pto_hours: Option<f64>,
    pub time_blocks: Vec<TimeBlock>,
    pub priorities: Vec<Priority>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlock {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub task_id: Option<u64>, // None = scheduled only, counts for nothing
    pub content: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub content: String,
    pub order: u32,
    pub completed: bool,
}

impl DailyPlan {
    pub fn new(user_id: u64, date: NaiveDate) -> Self {
        Self {
            id: 0,
            user_id,
            date,
            productivity_rating: None,
            brain_dump: None,
            pto_hours: None,
            time_blocks: Vec::new(),
            priorities: Vec::new(),
        }
    }

    pub fn incomplete_priorities(&self) -> Vec<Priority> {
        self.priorities
            .iter()
            .filter(|p| !p.completed)
            .cloned()
            .collect()
    }
}

impl TimeBlock {
    pub fn new(start_time: NaiveTime, end_time: NaiveTime, task_id: Option<u64>) -> Self {
        Self {
            start_time,
            end_time,
            task_id,
            content: None,
            completed: false,
        }
    }
}

impl Priority {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            order: 0,
            completed: false,
        }
    }

    fn merge_key(&self) -> String {
        self.content.trim().to_lowercase()
    }
}

/// Merges `incoming` into `existing` by content.
///
/// Existing entries keep their slot and completion state, incoming entries
/// whose content is already present are dropped, new content is appended.
/// Blank entries are discarded and `order` is renumbered from zero.
pub fn merge_priorities(existing: &[Priority], incoming: &[Priority]) -> Vec<Priority> {
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(existing.len() + incoming.len());

    for priority in existing.iter().chain(incoming) {
        let key = priority.merge_key();
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        merged.push(priority.clone());
    }

    for (index, priority) in merged.iter_mut().enumerate() {
        priority.order = index as u32;
    }
    merged
}
