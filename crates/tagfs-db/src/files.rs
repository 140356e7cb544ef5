//! File repository implementation.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use tagfs_core::{Error, FileRepository, FileWithTags, Result, TagDiff, TagRef};

use crate::escape_like;

/// SQLite implementation of FileRepository.
#[derive(Clone)]
pub struct SqliteFileRepository {
    pool: SqlitePool,
}

impl SqliteFileRepository {
    /// Create a new SqliteFileRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Resolve the full tag lists for a set of files, keyed by file id.
    async fn tags_for_files(&self, file_ids: &[i64]) -> Result<HashMap<i64, Vec<TagRef>>> {
        let mut by_file: HashMap<i64, Vec<TagRef>> = HashMap::new();
        if file_ids.is_empty() {
            return Ok(by_file);
        }

        let placeholders = vec!["?"; file_ids.len()].join(", ");
        let query = format!(
            r#"
            SELECT ft.file_id, t.id, t.name, t.color
            FROM file_tag ft
            JOIN tag t ON t.id = ft.tag_id
            WHERE ft.file_id IN ({})
            ORDER BY t."order"
            "#,
            placeholders
        );

        let mut q = sqlx::query(&query);
        for file_id in file_ids {
            q = q.bind(file_id);
        }

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;
        for row in rows {
            by_file
                .entry(row.get("file_id"))
                .or_default()
                .push(TagRef {
                    id: row.get("id"),
                    name: row.get("name"),
                    color: row.get("color"),
                });
        }

        Ok(by_file)
    }
}

#[async_trait]
impl FileRepository for SqliteFileRepository {
    async fn exists(&self, id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM file WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(exists)
    }

    async fn exists_by_path(&self, path: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM file WHERE path = ?)")
            .bind(path)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(exists)
    }

    async fn insert(&self, path: &str, name: &str, tag_ids: &[i64]) -> Result<i64> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let id = sqlx::query("INSERT INTO file (path, name, created_at) VALUES (?, ?, ?)")
            .bind(path)
            .bind(name)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?
            .last_insert_rowid();

        for tag_id in tag_ids {
            sqlx::query("INSERT INTO file_tag (file_id, tag_id) VALUES (?, ?)")
                .bind(id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "files",
            op = "insert",
            file_id = id,
            "File registered"
        );
        Ok(id)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM file WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn id_of_path(&self, path: &str) -> Result<i64> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM file WHERE path = ?")
            .bind(path)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        id.ok_or_else(|| Error::NotFound(format!("File '{}' does not exist", path)))
    }

    async fn path_of(&self, id: i64) -> Result<String> {
        let path: Option<String> = sqlx::query_scalar("SELECT path FROM file WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        path.ok_or(Error::FileNotFound(id))
    }

    async fn tags_of(&self, id: i64) -> Result<HashSet<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT tag_id FROM file_tag WHERE file_id = ?")
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(ids.into_iter().collect())
    }

    async fn apply_tag_diff(&self, id: i64, diff: &TagDiff) -> Result<()> {
        if diff.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        for tag_id in &diff.to_remove {
            sqlx::query("DELETE FROM file_tag WHERE file_id = ? AND tag_id = ?")
                .bind(id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
        }

        for tag_id in &diff.to_add {
            sqlx::query("INSERT INTO file_tag (file_id, tag_id) VALUES (?, ?)")
                .bind(id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn search(
        &self,
        name: Option<&str>,
        closures: &[HashSet<i64>],
    ) -> Result<Vec<FileWithTags>> {
        let mut wheres: Vec<String> = Vec::new();

        if name.is_some() {
            wheres.push(r"f.name LIKE ? ESCAPE '\'".to_string());
        }

        // One EXISTS per requested tag: the file's own tag set must intersect
        // every closure independently.
        for closure in closures {
            let placeholders = vec!["?"; closure.len()].join(", ");
            wheres.push(format!(
                "EXISTS (SELECT 1 FROM file_tag ft WHERE ft.file_id = f.id AND ft.tag_id IN ({}))",
                placeholders
            ));
        }

        let mut query = String::from("SELECT f.id, f.path, f.name, f.created_at FROM file f");
        if !wheres.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&wheres.join(" AND "));
        }
        query.push_str(" ORDER BY f.name");

        let mut q = sqlx::query(&query);
        if let Some(substring) = name {
            q = q.bind(format!("%{}%", escape_like(substring)));
        }
        for closure in closures {
            let mut ids: Vec<i64> = closure.iter().copied().collect();
            ids.sort_unstable();
            for tag_id in ids {
                q = q.bind(tag_id);
            }
        }

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;

        let file_ids: Vec<i64> = rows.iter().map(|r| r.get("id")).collect();
        let mut tags_by_file = self.tags_for_files(&file_ids).await?;

        let files = rows
            .into_iter()
            .map(|row| {
                let id: i64 = row.get("id");
                FileWithTags {
                    id,
                    path: row.get("path"),
                    name: row.get("name"),
                    created_at: row.get("created_at"),
                    tags: tags_by_file.remove(&id).unwrap_or_default(),
                }
            })
            .collect();

        Ok(files)
    }
}
