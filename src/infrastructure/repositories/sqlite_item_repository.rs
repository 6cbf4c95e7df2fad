use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::domain::entities::{ItemKind, ItemPriority, RecurringItem};
use crate::domain::repositories::{RecurringItemRepository, RepositoryError, Result};
use crate::domain::value_objects::RecurrenceRule;
use crate::infrastructure::database::DatabaseManager;

const ITEM_COLUMNS: &str = "id, user_id, kind, title, description, category_id, role_id, \
     priority, estimated_minutes, due_date, is_recurring, recurrence_rule, completed, \
     completed_at, created_at";

pub struct SqliteItemRepository {
    db: DatabaseManager,
}

impl SqliteItemRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }

    // NOTE: kept synchronous because it runs inside spawn_blocking
    fn row_to_item(row: &Row) -> rusqlite::Result<RecurringItem> {
        let kind_raw: String = row.get("kind")?;
        let kind = ItemKind::from_str(&kind_raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Text,
                format!("unknown item kind {kind_raw:?}").into(),
            )
        })?;

        let priority: String = row.get("priority")?;
        let rule: Option<String> = row.get("recurrence_rule")?;

        Ok(RecurringItem {
            id: row.get::<_, i64>("id")? as u64,
            user_id: row.get::<_, i64>("user_id")? as u64,
            kind,
            title: row.get("title")?,
            description: row.get("description")?,
            category_id: row.get::<_, Option<i64>>("category_id")?.map(|v| v as u64),
            role_id: row.get::<_, Option<i64>>("role_id")?.map(|v| v as u64),
            priority: ItemPriority::from_str(&priority),
            estimated_minutes: row.get("estimated_minutes")?,
            due_date: row.get("due_date")?,
            is_recurring: row.get("is_recurring")?,
            recurrence_rule: rule.as_deref().map(RecurrenceRule::from_label),
            completed: row.get("completed")?,
            completed_at: row.get("completed_at")?,
            created_at: row.get("created_at")?,
        })
    }

    fn insert_item(conn: &Connection, item: &RecurringItem) -> rusqlite::Result<u64> {
        conn.execute(
            "INSERT INTO items (
                user_id, kind, title, description, category_id, role_id, priority,
                estimated_minutes, due_date, is_recurring, recurrence_rule, completed,
                completed_at, created_at
             )
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                item.user_id as i64,
                item.kind.as_str(),
                item.title,
                item.description,
                item.category_id.map(|v| v as i64),
                item.role_id.map(|v| v as i64),
                item.priority.as_str(),
                item.estimated_minutes,
                item.due_date,
                item.is_recurring,
                item.recurrence_rule.map(|rule| rule.as_str()),
                item.completed,
                item.completed_at,
                item.created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid() as u64)
    }
}

#[async_trait]
impl RecurringItemRepository for SqliteItemRepository {
    async fn get(&self, item_id: u64) -> Result<Option<RecurringItem>> {
        let item = self
            .db
            .execute_blocking(move |conn| {
                conn.query_row(
                    &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"),
                    params![item_id as i64],
                    Self::row_to_item,
                )
                .optional()
            })
            .await?;
        Ok(item)
    }

    async fn insert(&self, item: &RecurringItem) -> Result<u64> {
        let item = item.clone();
        let id = self
            .db
            .execute_blocking(move |conn| Self::insert_item(conn, &item))
            .await?;
        Ok(id)
    }

    async fn list_for_user(&self, user_id: u64) -> Result<Vec<RecurringItem>> {
        let items = self
            .db
            .execute_blocking(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {ITEM_COLUMNS} FROM items WHERE user_id = ?1 ORDER BY id"
                ))?;
                let rows = stmt.query_map(params![user_id as i64], Self::row_to_item)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
            })
            .await?;
        Ok(items)
    }

    async fn complete_with_successor(
        &self,
        completed: &RecurringItem,
        successor: Option<&RecurringItem>,
    ) -> Result<Option<u64>> {
        let item_id = completed.id;
        let completed_at = completed.completed_at;
        let successor = successor.cloned();

        let (updated, successor_id) = self
            .db
            .execute_blocking(move |conn| {
                let tx = conn.unchecked_transaction()?;

                // the completed = 0 guard lets only one concurrent completion through
                let updated = tx.execute(
                    "UPDATE items SET completed = 1, completed_at = ?2
                     WHERE id = ?1 AND completed = 0",
                    params![item_id as i64, completed_at],
                )?;
                if updated == 0 {
                    return Ok((0, None));
                }

                let successor_id = match &successor {
                    Some(next) => Some(Self::insert_item(&tx, next)?),
                    None => None,
                };

                tx.commit()?;
                Ok((updated, successor_id))
            })
            .await?;

        if updated == 0 {
            return Err(RepositoryError::InvalidData(format!(
                "Item #{item_id} does not exist or is already completed"
            )));
        }
        Ok(successor_id)
    }

    async fn delete_completed_todos_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let deleted = self
            .db
            .execute_blocking(move |conn| {
                conn.execute(
                    "DELETE FROM items
                     WHERE kind = ?2 AND completed = 1
                       AND completed_at IS NOT NULL AND completed_at < ?1",
                    params![cutoff, ItemKind::ToDo.as_str()],
                )
            })
            .await?;
        Ok(deleted)
    }
}
