use async_trait::async_trait;
use rusqlite::params;

use crate::domain::entities::Category;
use crate::domain::repositories::{CategoryRepository, Result};
use crate::infrastructure::database::DatabaseManager;

pub struct SqliteCategoryRepository {
    db: DatabaseManager,
}

impl SqliteCategoryRepository {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn insert(&self, category: &Category) -> Result<u64> {
        let category = category.clone();
        let id = self
            .db
            .execute_blocking(move |conn| {
                conn.execute(
                    "INSERT INTO categories (user_id, name, color) VALUES (?1, ?2, ?3)",
                    params![category.user_id as i64, category.name, category.color],
                )?;
                Ok(conn.last_insert_rowid() as u64)
            })
            .await?;
        Ok(id)
    }

    async fn list_for_user(&self, user_id: u64) -> Result<Vec<Category>> {
        let categories = self
            .db
            .execute_blocking(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, name, color FROM categories WHERE user_id = ?1 ORDER BY id",
                )?;
                let rows = stmt.query_map(params![user_id as i64], |row| {
                    Ok(Category {
                        id: row.get::<_, i64>(0)? as u64,
                        user_id: row.get::<_, i64>(1)? as u64,
                        name: row.get(2)?,
                        color: row.get(3)?,
                    })
                })?;
                rows.collect::<rusqlite::Result<Vec<_>>>()
            })
            .await?;
        Ok(categories)
    }
}
