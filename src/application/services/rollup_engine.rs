//! Aggregation of scheduled time blocks into category, task and daily totals.
//!
//! Minutes are counted per block, never from the stored start/end times:
//! every block linked to a task is worth exactly [`BLOCK_MINUTES`]. Blocks with
//! no task are schedule placeholders and contribute nothing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::warn;

use crate::domain::entities::category::{DEFAULT_WORK_COLOR, is_work_name};
use crate::domain::entities::{BlockSnapshot, Category, TaskSnapshot, WorkHourGoals};
use crate::domain::value_objects::DateRange;

/// Length of one time block.
pub const BLOCK_MINUTES: u64 = 15;

pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Name given to the Work bucket when PTO arrives before any Work block.
pub const WORK_CATEGORY_NAME: &str = "Work";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupResult {
    pub range: DateRange,
    pub total_minutes: u64,
    pub work_minutes: u64,
    pub categories: Vec<CategoryTotal>,
    pub tasks: Vec<TaskTotal>,
    pub daily: Vec<DailyBreakdown>,
    pub weekly_progress: f64,
    pub monthly_progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub color: String,
    pub total_minutes: u64,
    pub days_used: u32,
    pub avg_daily_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTotal {
    pub task_id: u64,
    pub title: String,
    pub category_name: String,
    pub total_minutes: u64,
    pub sessions: u32,
    pub last_worked_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBreakdown {
    pub date: NaiveDate,
    pub total_minutes: u64,
    pub by_category: Vec<CategoryMinutes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMinutes {
    pub name: String,
    pub minutes: u64,
}

impl RollupResult {
    pub fn category(&self, name: &str) -> Option<&CategoryTotal> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn task(&self, task_id: u64) -> Option<&TaskTotal> {
        self.tasks.iter().find(|t| t.task_id == task_id)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DailyBreakdown> {
        self.daily.iter().find(|d| d.date == date)
    }

    pub fn total_hours(&self) -> f64 {
        minutes_to_hours(self.total_minutes)
    }

    pub fn work_hours(&self) -> f64 {
        minutes_to_hours(self.work_minutes)
    }
}

impl DailyBreakdown {
    pub fn minutes_for(&self, category: &str) -> u64 {
        self.by_category
            .iter()
            .find(|c| c.name == category)
            .map_or(0, |c| c.minutes)
    }
}

pub fn minutes_to_hours(minutes: u64) -> f64 {
    minutes as f64 / MINUTES_PER_HOUR
}

/// Percentage of `goal_hours` covered by `work_minutes`, capped to `0..=100`.
///
/// A goal of zero (or less) counts as met as soon as any work is logged.
pub fn goal_progress(work_minutes: u64, goal_hours: f64) -> f64 {
    if goal_hours.is_nan() || goal_hours <= 0.0 {
        return if work_minutes > 0 { 100.0 } else { 0.0 };
    }
    let percentage = work_minutes as f64 / (goal_hours * MINUTES_PER_HOUR) * 100.0;
    percentage.clamp(0.0, 100.0)
}

/// Aggregates `blocks` over `range`, folding `pto_by_date` into the Work bucket.
///
/// Blocks and PTO outside the range are ignored. Every date of the range gets
/// a `daily` entry, even without activity. The result depends only on the
/// inputs: block order does not matter and nothing is mutated.
pub fn rollup(
    blocks: &[BlockSnapshot],
    range: DateRange,
    pto_by_date: &BTreeMap<NaiveDate, f64>,
    goals: &WorkHourGoals,
) -> RollupResult {
    let mut linked: Vec<(&BlockSnapshot, &TaskSnapshot)> = blocks
        .iter()
        .filter(|block| range.contains(block.date))
        .filter_map(|block| block.task.as_ref().map(|task| (block, task)))
        .collect();
    linked.sort_by_key(|(block, _)| (block.date, block.start_time));

    let mut categories = CategoryTally::default();
    let mut tasks = TaskTally::default();
    let mut days: BTreeMap<NaiveDate, DayTally> = BTreeMap::new();

    for (block, task) in linked {
        categories.add(&task.category, block.date, BLOCK_MINUTES);
        tasks.add(task, block.date);
        days.entry(block.date)
            .or_default()
            .add(&task.category.name, BLOCK_MINUTES);
    }

    for (date, hours) in pto_by_date.range(range.start()..=range.end()) {
        let minutes = pto_minutes(*date, *hours);
        if minutes == 0 {
            continue;
        }
        let work = categories.work_category();
        categories.add(&work, *date, minutes);
        days.entry(*date).or_default().add(&work.name, minutes);
    }

    let daily: Vec<DailyBreakdown> = range
        .days()
        .map(|date| match days.remove(&date) {
            Some(day) => DailyBreakdown {
                date,
                total_minutes: day.total_minutes,
                by_category: day.by_category,
            },
            None => DailyBreakdown {
                date,
                total_minutes: 0,
                by_category: Vec::new(),
            },
        })
        .collect();

    let categories = categories.finish();
    let total_minutes = daily.iter().map(|d| d.total_minutes).sum();
    let work_minutes = categories
        .iter()
        .filter(|c| is_work_name(&c.name))
        .map(|c| c.total_minutes)
        .sum();

    RollupResult {
        range,
        total_minutes,
        work_minutes,
        categories,
        tasks: tasks.entries,
        daily,
        weekly_progress: goal_progress(work_minutes, goals.weekly_hours),
        monthly_progress: goal_progress(work_minutes, goals.monthly_hours),
    }
}

fn pto_minutes(date: NaiveDate, hours: f64) -> u64 {
    if !hours.is_finite() || hours < 0.0 {
        warn!("Ignoring invalid PTO value {} recorded on {}", hours, date);
        return 0;
    }
    (hours * MINUTES_PER_HOUR).round() as u64
}

#[derive(Default)]
struct CategoryTally {
    entries: Vec<(CategoryTotal, BTreeSet<NaiveDate>)>,
    index: HashMap<String, usize>,
}

impl CategoryTally {
    fn add(&mut self, category: &Category, date: NaiveDate, minutes: u64) {
        let slot = match self.index.get(&category.name) {
            Some(&slot) => slot,
            None => {
                self.entries.push((
                    CategoryTotal {
                        name: category.name.clone(),
                        color: category.color.clone(),
                        total_minutes: 0,
                        days_used: 0,
                        avg_daily_minutes: 0.0,
                    },
                    BTreeSet::new(),
                ));
                self.index.insert(category.name.clone(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let (total, dates) = &mut self.entries[slot];
        total.total_minutes += minutes;
        dates.insert(date);
    }

    /// First Work-named category seen so far, or a fresh "Work" bucket.
    fn work_category(&self) -> Category {
        self.entries
            .iter()
            .map(|(total, _)| total)
            .find(|total| is_work_name(&total.name))
            .map(|total| Category {
                id: 0,
                user_id: 0,
                name: total.name.clone(),
                color: total.color.clone(),
            })
            .unwrap_or_else(|| Category {
                id: 0,
                user_id: 0,
                name: WORK_CATEGORY_NAME.to_string(),
                color: DEFAULT_WORK_COLOR.to_string(),
            })
    }

    fn finish(self) -> Vec<CategoryTotal> {
        self.entries
            .into_iter()
            .map(|(mut total, dates)| {
                total.days_used = dates.len() as u32;
                total.avg_daily_minutes = total.total_minutes as f64 / dates.len().max(1) as f64;
                total
            })
            .collect()
    }
}

#[derive(Default)]
struct TaskTally {
    entries: Vec<TaskTotal>,
    index: HashMap<u64, usize>,
}

impl TaskTally {
    fn add(&mut self, task: &TaskSnapshot, date: NaiveDate) {
        match self.index.get(&task.id) {
            Some(&slot) => {
                let total = &mut self.entries[slot];
                total.total_minutes += BLOCK_MINUTES;
                total.sessions += 1;
                total.last_worked_on = total.last_worked_on.max(date);
            }
            None => {
                self.index.insert(task.id, self.entries.len());
                self.entries.push(TaskTotal {
                    task_id: task.id,
                    title: task.title.clone(),
                    category_name: task.category.name.clone(),
                    total_minutes: BLOCK_MINUTES,
                    sessions: 1,
                    last_worked_on: date,
                });
            }
        }
    }
}

#[derive(Default)]
struct DayTally {
    total_minutes: u64,
    by_category: Vec<CategoryMinutes>,
}

impl DayTally {
    fn add(&mut self, category: &str, minutes: u64) {
        self.total_minutes += minutes;
        match self.by_category.iter_mut().find(|c| c.name == category) {
            Some(entry) => entry.minutes += minutes,
            None => self.by_category.push(CategoryMinutes {
                name: category.to_string(),
                minutes,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn category(id: u64, name: &str) -> Category {
        Category {
            id,
            user_id: 1,
            name: name.to_string(),
            color: format!("#{:06x}", id),
        }
    }

    fn task(id: u64, category: &Category) -> TaskSnapshot {
        TaskSnapshot {
            id,
            title: format!("Task {id}"),
            category: category.clone(),
        }
    }

    fn block(date: NaiveDate, hour: u32, minute: u32, task: Option<&TaskSnapshot>) -> BlockSnapshot {
        let start = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
        BlockSnapshot {
            date,
            start_time: start,
            end_time: start + chrono::Duration::minutes(15),
            completed: false,
            task: task.cloned(),
        }
    }

    fn june_week() -> DateRange {
        DateRange::new(d(2025, 6, 1), d(2025, 6, 7)).unwrap()
    }

    #[test]
    fn empty_input_yields_zero_filled_days() {
        let result = rollup(&[], june_week(), &BTreeMap::new(), &WorkHourGoals::default());

        assert_eq!(result.total_minutes, 0);
        assert_eq!(result.work_minutes, 0);
        assert_eq!(result.daily.len(), 7);
        assert!(result.daily.iter().all(|day| day.total_minutes == 0));
        assert!(result.daily.iter().all(|day| day.by_category.is_empty()));
        assert!(result.categories.is_empty());
        assert!(result.tasks.is_empty());
        assert_eq!(result.weekly_progress, 0.0);
        assert_eq!(result.daily[0].date, d(2025, 6, 1));
        assert_eq!(result.daily[6].date, d(2025, 6, 7));
    }

    #[test]
    fn four_work_blocks_make_an_hour() {
        let work = category(1, "Work");
        let report = task(10, &work);
        let blocks: Vec<_> = (0..4)
            .map(|i| block(d(2025, 6, 2), 9, i * 15, Some(&report)))
            .collect();

        let result = rollup(&blocks, june_week(), &BTreeMap::new(), &WorkHourGoals::default());

        let total = result.category("Work").unwrap();
        assert_eq!(total.total_minutes, 60);
        assert_eq!(total.days_used, 1);
        assert_eq!(total.avg_daily_minutes, 60.0);
        assert_eq!(result.total_minutes, 60);
        assert_eq!(result.work_minutes, 60);
        let task_total = result.task(10).unwrap();
        assert_eq!(task_total.total_minutes, 60);
        assert_eq!(task_total.sessions, 4);
        assert_eq!(task_total.category_name, "Work");
        assert_eq!(result.day(d(2025, 6, 2)).unwrap().minutes_for("Work"), 60);
    }

    #[test]
    fn block_length_ignores_stored_times() {
        let work = category(1, "Work");
        let t = task(1, &work);
        let mut long = block(d(2025, 6, 3), 8, 0, Some(&t));
        long.end_time = NaiveTime::from_hms_opt(12, 0, 0).unwrap();

        let result = rollup(&[long], june_week(), &BTreeMap::new(), &WorkHourGoals::default());
        assert_eq!(result.total_minutes, BLOCK_MINUTES);
    }

    #[test]
    fn unlinked_and_out_of_range_blocks_count_for_nothing() {
        let work = category(1, "Work");
        let t = task(1, &work);
        let blocks = vec![
            block(d(2025, 6, 3), 8, 0, None),
            block(d(2025, 5, 31), 8, 0, Some(&t)),
            block(d(2025, 6, 8), 8, 0, Some(&t)),
        ];

        let result = rollup(&blocks, june_week(), &BTreeMap::new(), &WorkHourGoals::default());
        assert_eq!(result.total_minutes, 0);
        assert!(result.categories.is_empty());
    }

    #[test]
    fn average_divides_by_distinct_days() {
        let personal = category(2, "Personal");
        let t = task(5, &personal);
        let blocks = vec![
            block(d(2025, 6, 1), 7, 0, Some(&t)),
            block(d(2025, 6, 1), 7, 15, Some(&t)),
            block(d(2025, 6, 4), 7, 0, Some(&t)),
        ];

        let result = rollup(&blocks, june_week(), &BTreeMap::new(), &WorkHourGoals::default());
        let total = result.category("Personal").unwrap();
        assert_eq!(total.total_minutes, 45);
        assert_eq!(total.days_used, 2);
        assert_eq!(total.avg_daily_minutes, 22.5);
        assert_eq!(result.task(5).unwrap().last_worked_on, d(2025, 6, 4));
    }

    #[test]
    fn pto_without_blocks_lands_in_work() {
        let pto = BTreeMap::from([(d(2025, 6, 3), 2.0)]);

        let result = rollup(&[], june_week(), &pto, &WorkHourGoals::default());

        let day = result.day(d(2025, 6, 3)).unwrap();
        assert_eq!(day.total_minutes, 120);
        assert_eq!(day.minutes_for(WORK_CATEGORY_NAME), 120);
        let work = result.category(WORK_CATEGORY_NAME).unwrap();
        assert_eq!(work.total_minutes, 120);
        assert_eq!(work.color, DEFAULT_WORK_COLOR);
        assert_eq!(work.days_used, 1);
        assert_eq!(result.total_minutes, 120);
        assert_eq!(result.work_minutes, 120);
    }

    #[test]
    fn pto_joins_existing_work_alias() {
        let aps = category(3, "APS");
        let t = task(8, &aps);
        let blocks = vec![block(d(2025, 6, 2), 10, 0, Some(&t))];
        let pto = BTreeMap::from([(d(2025, 6, 2), 1.5), (d(2025, 6, 20), 8.0)]);

        let result = rollup(&blocks, june_week(), &pto, &WorkHourGoals::default());

        assert_eq!(result.categories.len(), 1);
        let aps_total = result.category("APS").unwrap();
        assert_eq!(aps_total.total_minutes, 15 + 90);
        assert_eq!(aps_total.days_used, 1);
        assert_eq!(result.day(d(2025, 6, 2)).unwrap().total_minutes, 105);
        assert_eq!(result.work_minutes, 105);
    }

    #[test]
    fn invalid_pto_is_ignored() {
        let pto = BTreeMap::from([(d(2025, 6, 2), -3.0), (d(2025, 6, 3), f64::NAN)]);
        let result = rollup(&[], june_week(), &pto, &WorkHourGoals::default());
        assert_eq!(result.total_minutes, 0);
        assert!(result.categories.is_empty());
    }

    #[test]
    fn progress_is_capped_at_one_hundred() {
        let goals = WorkHourGoals {
            weekly_hours: 1.0,
            monthly_hours: 4.0,
        };
        let work = category(1, "Work");
        let t = task(1, &work);
        // 8 blocks = 2 hours = 200% of the weekly goal
        let blocks: Vec<_> = (0..8)
            .map(|i| block(d(2025, 6, 5), 9 + i / 4, (i % 4) * 15, Some(&t)))
            .collect();

        let result = rollup(&blocks, june_week(), &BTreeMap::new(), &goals);

        assert_eq!(result.work_minutes, 120);
        assert_eq!(result.weekly_progress, 100.0);
        assert_eq!(result.monthly_progress, 50.0);
    }

    #[test]
    fn goal_progress_bounds() {
        assert_eq!(goal_progress(0, 32.0), 0.0);
        assert_eq!(goal_progress(32 * 60 * 2, 32.0), 100.0);
        assert_eq!(goal_progress(16 * 60, 32.0), 50.0);
        assert_eq!(goal_progress(0, 0.0), 0.0);
        assert_eq!(goal_progress(15, 0.0), 100.0);
        assert_eq!(goal_progress(15, -5.0), 100.0);
        assert_eq!(goal_progress(15, f64::INFINITY), 0.0);
    }

    #[test]
    fn order_follows_first_encounter_by_date_then_start() {
        let work = category(1, "Work");
        let church = category(2, "Church");
        let w = task(1, &work);
        let c = task(2, &church);
        // given out of order on purpose
        let blocks = vec![
            block(d(2025, 6, 3), 9, 0, Some(&w)),
            block(d(2025, 6, 2), 11, 0, Some(&w)),
            block(d(2025, 6, 2), 8, 0, Some(&c)),
        ];

        let result = rollup(&blocks, june_week(), &BTreeMap::new(), &WorkHourGoals::default());

        let names: Vec<_> = result.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Church", "Work"]);
        let ids: Vec<_> = result.tasks.iter().map(|t| t.task_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn repeated_calls_are_identical_and_leave_input_alone() {
        let work = category(1, "Work");
        let t = task(1, &work);
        let blocks = vec![
            block(d(2025, 6, 2), 9, 0, Some(&t)),
            block(d(2025, 6, 1), 9, 0, Some(&t)),
        ];
        let snapshot = blocks.clone();
        let pto = BTreeMap::from([(d(2025, 6, 4), 4.0)]);
        let goals = WorkHourGoals::default();

        let first = rollup(&blocks, june_week(), &pto, &goals);
        let second = rollup(&blocks, june_week(), &pto, &goals);

        assert_eq!(first, second);
        assert_eq!(blocks, snapshot);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
