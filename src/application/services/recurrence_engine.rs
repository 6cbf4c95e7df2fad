//! Next-occurrence arithmetic and completion of recurring items.
//!
//! `advance` is total: month-based rules clamp a missing day of month to the
//! 28th instead of failing, so any valid date and rule yields a later date.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use tracing::{debug, info};

use crate::domain::entities::RecurringItem;
use crate::domain::value_objects::RecurrenceRule;

/// Day used when the original day of month does not exist in the target month.
const CLAMP_DAY: u32 = 28;

/// Computes the due date following `date` under `rule`.
pub fn advance(date: NaiveDate, rule: RecurrenceRule) -> NaiveDate {
    match rule {
        RecurrenceRule::Daily => add_days(date, 1),
        RecurrenceRule::Weekly => add_days(date, 7),
        RecurrenceRule::BiWeekly => add_days(date, 14),
        RecurrenceRule::Monthly => add_months_clamped(date, 1),
        RecurrenceRule::Quarterly => add_months_clamped(date, 3),
        RecurrenceRule::Yearly => add_months_clamped(date, 12),
    }
}

/// `advance` for a raw stored label; unknown labels advance one week.
pub fn advance_label(date: NaiveDate, label: &str) -> NaiveDate {
    advance(date, RecurrenceRule::from_label(label))
}

/// Marks `item` completed at `now` and builds its successor, if it has one.
///
/// No successor is produced for non-recurring items, recurring items without
/// a rule, or items without a due date; the completion itself still happens.
/// An item that is already completed is left untouched.
pub fn complete_and_advance(item: &mut RecurringItem, now: DateTime<Utc>) -> Option<RecurringItem> {
    if item.completed {
        debug!("Item #{} is already completed, nothing to advance", item.id);
        return None;
    }

    item.completed = true;
    item.completed_at = Some(now);

    let rule = item.active_rule()?;
    let Some(due) = item.due_date else {
        debug!(
            "Recurring item #{} has no due date, completing without successor",
            item.id
        );
        return None;
    };

    let next_due = advance(due, rule);
    info!(
        "Item #{} '{}' recurs {}: next due {}",
        item.id, item.title, rule, next_due
    );
    Some(item.successor(next_due, now))
}

// Saturates at the end of chrono's calendar instead of panicking.
fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}

fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    let zero_based = date.month0() + months;
    let year = date.year() + (zero_based / 12) as i32;
    let month = zero_based % 12 + 1;

    NaiveDate::from_ymd_opt(year, month, date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, month, CLAMP_DAY))
        .unwrap_or(NaiveDate::MAX)
}
