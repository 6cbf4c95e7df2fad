use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::BTreeMap;

use crate::domain::entities::{
    BlockSnapshot, Category, DailyPlan, Priority, TaskSnapshot, TimeBlock,
};
use crate::domain::repositories::{DailyPlanRepository, Result};
use crate::domain::value_objects::DateRange;
use crate::infrastructure::database::DatabaseManager;

/// Category reported for blocks whose task has none.
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";
pub const UNCATEGORIZED_COLOR: &str = "#6c757d";

pub struct SqlitePlanRepository {
    db: DatabaseManager,
}

impl SqlitePlanRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    fn load_plan(conn: &Connection, user_id: u64, date: NaiveDate) -> rusqlite::Result<Option<DailyPlan>> {
        let plan = conn
            .query_row(
                "SELECT id, user_id, date, productivity_rating, brain_dump, pto_hours
                 FROM daily_plans WHERE user_id = ?1 AND date = ?2",
                params![user_id as i64, date],
                |row| {
                    Ok(DailyPlan {
                        id: row.get::<_, i64>(0)? as u64,
                        user_id: row.get::<_, i64>(1)? as u64,
                        date: row.get(2)?,
                        productivity_rating: row.get(3)?,
                        brain_dump: row.get(4)?,
                        pto_hours: row.get(5)?,
                        time_blocks: Vec::new(),
                        priorities: Vec::new(),
                    })
                },
            )
            .optional()?;

        let Some(mut plan) = plan else {
            return Ok(None);
        };

        let mut blocks = conn.prepare(
            "SELECT start_time, end_time, task_id, content, completed
             FROM time_blocks WHERE daily_plan_id = ?1 ORDER BY start_time, id",
        )?;
        plan.time_blocks = blocks
            .query_map(params![plan.id as i64], |row| {
                Ok(TimeBlock {
                    start_time: row.get(0)?,
                    end_time: row.get(1)?,
                    task_id: row.get::<_, Option<i64>>(2)?.map(|v| v as u64),
                    content: row.get(3)?,
                    completed: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut priorities = conn.prepare(
            "SELECT content, position, completed
             FROM priorities WHERE daily_plan_id = ?1 ORDER BY position, id",
        )?;
        plan.priorities = priorities
            .query_map(params![plan.id as i64], |row| {
                Ok(Priority {
                    content: row.get(0)?,
                    order: row.get(1)?,
                    completed: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(plan))
    }

    fn row_to_snapshot(row: &Row) -> rusqlite::Result<BlockSnapshot> {
        let task_id: Option<i64> = row.get("task_id")?;
        let task = match task_id {
            Some(task_id) => {
                let category = match row.get::<_, Option<i64>>("category_id")? {
                    Some(category_id) => Category {
                        id: category_id as u64,
                        user_id: row.get::<_, i64>("category_user_id")? as u64,
                        name: row.get("category_name")?,
                        color: row.get("category_color")?,
                    },
                    None => Category {
                        id: 0,
                        user_id: 0,
                        name: UNCATEGORIZED_NAME.to_string(),
                        color: UNCATEGORIZED_COLOR.to_string(),
                    },
                };
                Some(TaskSnapshot {
                    id: task_id as u64,
                    title: row.get("task_title")?,
                    category,
                })
            }
            None => None,
        };

        Ok(BlockSnapshot {
            date: row.get("date")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            completed: row.get("completed")?,
            task,
        })
    }
}

#[async_trait]
impl DailyPlanRepository for SqlitePlanRepository {
    async fn get_plan(&self, user_id: u64, date: NaiveDate) -> Result<Option<DailyPlan>> {
        let plan = self
            .db
            .execute_blocking(move |conn| Self::load_plan(conn, user_id, date))
            .await?;
        Ok(plan)
    }

    async fn save_plan(&self, plan: &DailyPlan) -> Result<u64> {
        let plan = plan.clone();

        let id = self
            .db
            .execute_blocking(move |conn| {
                let tx = conn.unchecked_transaction()?;

                let plan_id: i64 = tx.query_row(
                    "INSERT INTO daily_plans (user_id, date, productivity_rating, brain_dump, pto_hours)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(user_id, date) DO UPDATE SET
                        productivity_rating = excluded.productivity_rating,
                        brain_dump = excluded.brain_dump,
                        pto_hours = excluded.pto_hours
                     RETURNING id",
                    params![
                        plan.user_id as i64,
                        plan.date,
                        plan.productivity_rating,
                        plan.brain_dump,
                        plan.pto_hours
                    ],
                    |row| row.get(0),
                )?;

                // full replace: no merging of blocks or priorities at this level
                tx.execute(
                    "DELETE FROM time_blocks WHERE daily_plan_id = ?1",
                    params![plan_id],
                )?;
                tx.execute(
                    "DELETE FROM priorities WHERE daily_plan_id = ?1",
                    params![plan_id],
                )?;

                {
                    let mut insert_block = tx.prepare(
                        "INSERT INTO time_blocks (daily_plan_id, start_time, end_time, task_id, content, completed)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    )?;
                    for block in &plan.time_blocks {
                        insert_block.execute(params![
                            plan_id,
                            block.start_time,
                            block.end_time,
                            block.task_id.map(|v| v as i64),
                            block.content,
                            block.completed
                        ])?;
                    }

                    let mut insert_priority = tx.prepare(
                        "INSERT INTO priorities (daily_plan_id, content, position, completed)
                         VALUES (?1, ?2, ?3, ?4)",
                    )?;
                    for priority in &plan.priorities {
                        insert_priority.execute(params![
                            plan_id,
                            priority.content,
                            priority.order,
                            priority.completed
                        ])?;
                    }
                }

                tx.commit()?;
                Ok(plan_id as u64)
            })
            .await?;
        Ok(id)
    }

    async fn load_blocks(&self, user_id: u64, range: DateRange) -> Result<Vec<BlockSnapshot>> {
        let blocks = self
            .db
            .execute_blocking(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT p.date, b.start_time, b.end_time, b.completed,
                            i.id AS task_id, i.title AS task_title,
                            c.id AS category_id, c.user_id AS category_user_id,
                            c.name AS category_name, c.color AS category_color
                     FROM time_blocks b
                     JOIN daily_plans p ON p.id = b.daily_plan_id
                     LEFT JOIN items i ON i.id = b.task_id
                     LEFT JOIN categories c ON c.id = i.category_id
                     WHERE p.user_id = ?1 AND p.date BETWEEN ?2 AND ?3
                     ORDER BY p.date, b.start_time, b.id",
                )?;
                let rows = stmt.query_map(
                    params![user_id as i64, range.start(), range.end()],
                    Self::row_to_snapshot,
                )?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
            })
            .await?;
        Ok(blocks)
    }

    async fn load_pto(&self, user_id: u64, range: DateRange) -> Result<BTreeMap<NaiveDate, f64>> {
        let pto = self
            .db
            .execute_blocking(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT date, pto_hours FROM daily_plans
                     WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3 AND pto_hours IS NOT NULL",
                )?;
                let rows = stmt.query_map(
                    params![user_id as i64, range.start(), range.end()],
                    |row| Ok((row.get::<_, NaiveDate>(0)?, row.get::<_, f64>(1)?)),
                )?;
                rows.collect::<rusqlite::Result<BTreeMap<_, _>>>()
            })
            .await?;
        Ok(pto)
    }

    async fn delete_plans_before(&self, cutoff: NaiveDate) -> Result<usize> {
        let deleted = self
            .db
            .execute_blocking(move |conn| {
                let tx = conn.unchecked_transaction()?;
                // children first so the purge does not depend on foreign_keys being on
                tx.execute(
                    "DELETE FROM time_blocks WHERE daily_plan_id IN
                        (SELECT id FROM daily_plans WHERE date < ?1)",
                    params![cutoff],
                )?;
                tx.execute(
                    "DELETE FROM priorities WHERE daily_plan_id IN
                        (SELECT id FROM daily_plans WHERE date < ?1)",
                    params![cutoff],
                )?;
                let deleted = tx.execute("DELETE FROM daily_plans WHERE date < ?1", params![cutoff])?;
                tx.commit()?;
                Ok(deleted)
            })
            .await?;
        Ok(deleted)
    }
}
