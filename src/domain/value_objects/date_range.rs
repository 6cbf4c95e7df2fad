use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive span of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `end` falls before `start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Window of `days` dates ending on `anchor` (a seven-day window covers anchor-6..=anchor).
    pub fn trailing(anchor: NaiveDate, days: u32) -> Self {
        let back = u64::from(days.max(1) - 1);
        let start = anchor.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        Self { start, end: anchor }
    }

    /// Monday through Friday of the week containing `date`.
    pub fn work_week_of(date: NaiveDate) -> Self {
        let offset = u64::from(date.weekday().num_days_from_monday());
        let monday = date.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN);
        let friday = monday.checked_add_days(Days::new(4)).unwrap_or(NaiveDate::MAX);
        Self {
            start: monday,
            end: friday,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn len_days(&self) -> u64 {
        (self.end - self.start).num_days() as u64 + 1
    }

    /// Smallest range covering both ranges.
    pub fn union(&self, other: &DateRange) -> DateRange {
        DateRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(DateRange::new(d(2025, 6, 7), d(2025, 6, 1)).is_none());
        assert!(DateRange::new(d(2025, 6, 1), d(2025, 6, 1)).is_some());
    }

    #[test]
    fn days_are_inclusive() {
        let range = DateRange::new(d(2025, 6, 1), d(2025, 6, 7)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(range.len_days(), 7);
        assert_eq!(days.first(), Some(&d(2025, 6, 1)));
        assert_eq!(days.last(), Some(&d(2025, 6, 7)));
    }

    #[test]
    fn trailing_window_ends_on_anchor() {
        let range = DateRange::trailing(d(2025, 3, 2), 7);
        assert_eq!(range.start(), d(2025, 2, 24));
        assert_eq!(range.end(), d(2025, 3, 2));
        assert_eq!(DateRange::trailing(d(2025, 3, 2), 30).len_days(), 30);
    }

    #[test]
    fn work_week_runs_monday_to_friday() {
        // 2025-06-05 is a Thursday
        let week = DateRange::work_week_of(d(2025, 6, 5));
        assert_eq!(week.start(), d(2025, 6, 2));
        assert_eq!(week.end(), d(2025, 6, 6));

        // Sunday belongs to the week that started the previous Monday
        let sunday = DateRange::work_week_of(d(2025, 6, 8));
        assert_eq!(sunday.start(), d(2025, 6, 2));
    }

    #[test]
    fn union_covers_both() {
        let a = DateRange::new(d(2025, 6, 1), d(2025, 6, 3)).unwrap();
        let b = DateRange::new(d(2025, 5, 20), d(2025, 6, 2)).unwrap();
        let u = a.union(&b);
        assert_eq!(u.start(), d(2025, 5, 20));
        assert_eq!(u.end(), d(2025, 6, 3));
        assert!(u.contains(d(2025, 5, 25)));
        assert!(!u.contains(d(2025, 6, 4)));
    }
}
