//! Tag repository implementation.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use tagfs_core::{CreateTagRequest, Error, Result, Tag, TagRepository};

/// SQLite implementation of TagRepository.
#[derive(Clone)]
pub struct SqliteTagRepository {
    pool: SqlitePool,
}

impl SqliteTagRepository {
    /// Create a new SqliteTagRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagRepository for SqliteTagRepository {
    async fn exists(&self, id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tag WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(exists)
    }

    async fn list(&self) -> Result<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.color, t."order" AS tag_order, t.created_at,
                   p.parent_tag_id
            FROM tag t
            LEFT JOIN tag_parent_tag p ON p.tag_id = t.id
            ORDER BY t."order"
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        // One row per (tag, parent) pair; fold parents into each tag.
        let mut tags: Vec<Tag> = Vec::new();
        let mut index: HashMap<i64, usize> = HashMap::new();

        for row in rows {
            let id: i64 = row.get("id");
            let slot = *index.entry(id).or_insert_with(|| {
                tags.push(Tag {
                    id,
                    name: row.get("name"),
                    color: row.get("color"),
                    parent_ids: Vec::new(),
                    order: row.get("tag_order"),
                    created_at: row.get("created_at"),
                });
                tags.len() - 1
            });

            if let Some(parent_id) = row.get::<Option<i64>, _>("parent_tag_id") {
                tags[slot].parent_ids.push(parent_id);
            }
        }

        Ok(tags)
    }

    async fn insert(&self, req: CreateTagRequest) -> Result<i64> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let next_order: i64 =
            sqlx::query_scalar(r#"SELECT COALESCE(MAX("order") + 1, 0) FROM tag"#)
                .fetch_one(&mut *tx)
                .await
                .map_err(Error::Database)?;

        let id = sqlx::query(r#"INSERT INTO tag (name, color, "order", created_at) VALUES (?, ?, ?, ?)"#)
            .bind(&req.name)
            .bind(&req.color)
            .bind(next_order)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?
            .last_insert_rowid();

        for parent_id in &req.parent_ids {
            sqlx::query("INSERT INTO tag_parent_tag (tag_id, parent_tag_id) VALUES (?, ?)")
                .bind(id)
                .bind(parent_id)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "tags",
            op = "insert",
            tag_id = id,
            "Tag created"
        );
        Ok(id)
    }

    async fn update_fields(&self, id: i64, name: Option<&str>, color: Option<&str>) -> Result<()> {
        let mut updates = Vec::new();
        if name.is_some() {
            updates.push("name = ?");
        }
        if color.is_some() {
            updates.push("color = ?");
        }
        if updates.is_empty() {
            return Ok(());
        }

        let query = format!("UPDATE tag SET {} WHERE id = ?", updates.join(", "));

        let mut q = sqlx::query(&query);
        if let Some(v) = name {
            q = q.bind(v);
        }
        if let Some(v) = color {
            q = q.bind(v);
        }

        q.bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(())
    }

    async fn replace_parents(&self, id: i64, parent_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query("DELETE FROM tag_parent_tag WHERE tag_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        for parent_id in parent_ids {
            sqlx::query("INSERT INTO tag_parent_tag (tag_id, parent_tag_id) VALUES (?, ?)")
                .bind(id)
                .bind(parent_id)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM tag WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn reorder(&self, ordered_ids: &[i64]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        for (position, id) in ordered_ids.iter().enumerate() {
            sqlx::query(r#"UPDATE tag SET "order" = ? WHERE id = ?"#)
                .bind(position as i64)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn parents_of(&self, id: i64) -> Result<HashSet<i64>> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT parent_tag_id FROM tag_parent_tag WHERE tag_id = ?")
                .bind(id)
                .fetch_all(&self.pool)
                .await
                .map_err(Error::Database)?;
        Ok(ids.into_iter().collect())
    }

    async fn children_of(&self, id: i64) -> Result<HashSet<i64>> {
        let ids: Vec<i64> =
            sqlx::query_scalar("SELECT tag_id FROM tag_parent_tag WHERE parent_tag_id = ?")
                .bind(id)
                .fetch_all(&self.pool)
                .await
                .map_err(Error::Database)?;
        Ok(ids.into_iter().collect())
    }
}
