use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::RecurrenceRule;

/// A task or todo that may repeat once completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringItem {
    pub id: u64,
    pub user_id: u64,
    pub kind: ItemKind,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<u64>,
    pub role_id: Option<u64>,
    pub priority: ItemPriority,
    pub estimated_minutes: Option<u32>,
    pub due_date: Option<NaiveDate>,
    pub is_recurring: bool,
    pub recurrence_rule: Option<RecurrenceRule>, // only meaningful when is_recurring
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Task,
    #[serde(rename = "todo")]
    ToDo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Task => "task",
            ItemKind::ToDo => "todo",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "task" => Some(ItemKind::Task),
            "todo" => Some(ItemKind::ToDo),
            _ => None,
        }
    }
}

impl ItemPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemPriority::Low => "low",
            ItemPriority::Medium => "medium",
            ItemPriority::High => "high",
        }
    }

    /// Unknown stored values read back as medium
    pub fn from_str(s: &str) -> Self {
        match s {
            "low" => ItemPriority::Low,
            "high" => ItemPriority::High,
            _ => ItemPriority::Medium,
        }
    }
}

impl RecurringItem {
    pub fn new(
        user_id: u64,
        kind: ItemKind,
        title: String,
        due_date: Option<NaiveDate>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0, // assigned by the repository
            user_id,
            kind,
            title,
            description: None,
            category_id: None,
            role_id: None,
            priority: ItemPriority::default(),
            estimated_minutes: None,
            due_date,
            is_recurring: false,
            recurrence_rule: None,
            completed: false,
            completed_at: None,
            created_at,
        }
    }

    pub fn recurring(mut self, rule: RecurrenceRule) -> Self {
        self.is_recurring = true;
        self.recurrence_rule = Some(rule);
        self
    }

    /// The rule to advance with, if this item repeats at all.
    pub fn active_rule(&self) -> Option<RecurrenceRule> {
        if self.is_recurring {
            self.recurrence_rule
        } else {
            None
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    /// Pending sibling carrying over ownership, content and the recurrence settings.
    pub fn successor(&self, next_due: NaiveDate, now: DateTime<Utc>) -> RecurringItem {
        RecurringItem {
            id: 0,
            due_date: Some(next_due),
            completed: false,
            completed_at: None,
            created_at: now,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn rule_is_ignored_unless_flagged_recurring() {
        let mut item = RecurringItem::new(1, ItemKind::Task, "Report".into(), None, created());
        item.recurrence_rule = Some(RecurrenceRule::Daily);
        assert_eq!(item.active_rule(), None);

        let item = item.recurring(RecurrenceRule::Monthly);
        assert_eq!(item.active_rule(), Some(RecurrenceRule::Monthly));
    }

    #[test]
    fn overdue_needs_pending_item_with_past_due_date() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let mut item = RecurringItem::new(
            1,
            ItemKind::ToDo,
            "Call".into(),
            NaiveDate::from_ymd_opt(2025, 6, 9),
            created(),
        );
        assert!(item.is_overdue(today));

        item.due_date = Some(today);
        assert!(!item.is_overdue(today));

        item.due_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        item.completed = true;
        assert!(!item.is_overdue(today));

        item.completed = false;
        item.due_date = None;
        assert!(!item.is_overdue(today));
    }

    #[test]
    fn kind_and_priority_labels() {
        assert_eq!(ItemKind::from_str(ItemKind::ToDo.as_str()), Some(ItemKind::ToDo));
        assert_eq!(ItemKind::from_str("note"), None);
        assert_eq!(ItemPriority::from_str("urgent"), ItemPriority::Medium);
        assert_eq!(ItemPriority::from_str(ItemPriority::High.as_str()), ItemPriority::High);
    }
}
