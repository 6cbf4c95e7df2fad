pub mod date_range;
pub mod recurrence_rule;

pub use date_range::DateRange;
pub use recurrence_rule::{RecurrenceRule, UnknownRecurrenceRule};
