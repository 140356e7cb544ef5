//! Test fixtures for database and service tests.
//!
//! Provides two kinds of test stores:
//! - [`TestDatabase`]: a real SQLite database held fully in memory, with
//!   migrations applied — integration tests run against it with no external
//!   service.
//! - [`MemoryRepository`]: a HashMap-backed fake implementing the same
//!   repository contract, demonstrating that the service layer depends only
//!   on the traits. It also counts writes, which lets tests assert that
//!   idempotent operations issue none.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use tagfs_core::{
    CreateTagRequest, Error, File, FileRepository, FileWithTags, Result, Tag, TagDiff,
    TagRepository, TagRef,
};

use crate::{Database, PoolConfig};

/// An in-memory SQLite database with migrations applied.
pub struct TestDatabase {
    pub db: Database,
}

impl TestDatabase {
    /// Create a fresh in-memory database.
    ///
    /// A single pooled connection keeps every query on the same in-memory
    /// database instance.
    pub async fn new() -> Self {
        let config = PoolConfig::new()
            .max_connections(1)
            .idle_timeout(Duration::from_secs(3600));

        let db = Database::connect_with("sqlite::memory:", config)
            .await
            .expect("Failed to create in-memory test database");

        Self { db }
    }
}

#[derive(Default)]
struct MemoryState {
    next_tag_id: i64,
    next_file_id: i64,
    tags: BTreeMap<i64, Tag>,
    files: BTreeMap<i64, File>,
    file_tags: HashMap<i64, HashSet<i64>>,
    write_ops: usize,
}

/// HashMap-backed fake implementing the full repository contract.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total individual row writes applied so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().write_ops
    }
}

#[async_trait]
impl TagRepository for MemoryRepository {
    async fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.state.lock().unwrap().tags.contains_key(&id))
    }

    async fn list(&self) -> Result<Vec<Tag>> {
        let state = self.state.lock().unwrap();
        let mut tags: Vec<Tag> = state.tags.values().cloned().collect();
        tags.sort_by_key(|t| t.order);
        Ok(tags)
    }

    async fn insert(&self, req: CreateTagRequest) -> Result<i64> {
        let mut state = self.state.lock().unwrap();
        state.next_tag_id += 1;
        let id = state.next_tag_id;

        let order = state
            .tags
            .values()
            .map(|t| t.order + 1)
            .max()
            .unwrap_or(0);

        state.tags.insert(
            id,
            Tag {
                id,
                name: req.name,
                color: req.color,
                parent_ids: req.parent_ids.clone(),
                order,
                created_at: Utc::now(),
            },
        );
        state.write_ops += 1 + req.parent_ids.len();
        Ok(id)
    }

    async fn update_fields(&self, id: i64, name: Option<&str>, color: Option<&str>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let tag = state.tags.get_mut(&id).ok_or(Error::TagNotFound(id))?;
        if let Some(name) = name {
            tag.name = name.to_string();
        }
        if let Some(color) = color {
            tag.color = color.to_string();
        }
        state.write_ops += 1;
        Ok(())
    }

    async fn replace_parents(&self, id: i64, parent_ids: &[i64]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let writes = 1 + parent_ids.len();
        let tag = state.tags.get_mut(&id).ok_or(Error::TagNotFound(id))?;
        tag.parent_ids = parent_ids.to_vec();
        state.write_ops += writes;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.tags.remove(&id);
        // Cascade: drop edges pointing at the deleted id.
        for tag in state.tags.values_mut() {
            tag.parent_ids.retain(|&p| p != id);
        }
        for tags in state.file_tags.values_mut() {
            tags.remove(&id);
        }
        state.write_ops += 1;
        Ok(())
    }

    async fn reorder(&self, ordered_ids: &[i64]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        for (position, id) in ordered_ids.iter().enumerate() {
            if let Some(tag) = state.tags.get_mut(id) {
                tag.order = position as i64;
            }
        }
        state.write_ops += ordered_ids.len();
        Ok(())
    }

    async fn parents_of(&self, id: i64) -> Result<HashSet<i64>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .tags
            .get(&id)
            .map(|t| t.parent_ids.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn children_of(&self, id: i64) -> Result<HashSet<i64>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .tags
            .values()
            .filter(|t| t.parent_ids.contains(&id))
            .map(|t| t.id)
            .collect())
    }
}

#[async_trait]
impl FileRepository for MemoryRepository {
    async fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.state.lock().unwrap().files.contains_key(&id))
    }

    async fn exists_by_path(&self, path: &str) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state.files.values().any(|f| f.path == path))
    }

    async fn insert(&self, path: &str, name: &str, tag_ids: &[i64]) -> Result<i64> {
        let mut state = self.state.lock().unwrap();
        state.next_file_id += 1;
        let id = state.next_file_id;

        state.files.insert(
            id,
            File {
                id,
                path: path.to_string(),
                name: name.to_string(),
                created_at: Utc::now(),
            },
        );
        state.file_tags.insert(id, tag_ids.iter().copied().collect());
        state.write_ops += 1 + tag_ids.len();
        Ok(id)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.files.remove(&id);
        state.file_tags.remove(&id);
        state.write_ops += 1;
        Ok(())
    }

    async fn id_of_path(&self, path: &str) -> Result<i64> {
        let state = self.state.lock().unwrap();
        state
            .files
            .values()
            .find(|f| f.path == path)
            .map(|f| f.id)
            .ok_or_else(|| Error::NotFound(format!("File '{}' does not exist", path)))
    }

    async fn path_of(&self, id: i64) -> Result<String> {
        let state = self.state.lock().unwrap();
        state
            .files
            .get(&id)
            .map(|f| f.path.clone())
            .ok_or(Error::FileNotFound(id))
    }

    async fn tags_of(&self, id: i64) -> Result<HashSet<i64>> {
        let state = self.state.lock().unwrap();
        Ok(state.file_tags.get(&id).cloned().unwrap_or_default())
    }

    async fn apply_tag_diff(&self, id: i64, diff: &TagDiff) -> Result<()> {
        if diff.is_empty() {
            return Ok(());
        }
        let mut state = self.state.lock().unwrap();
        let writes = diff.to_add.len() + diff.to_remove.len();
        let tags = state.file_tags.entry(id).or_default();
        for tag_id in &diff.to_remove {
            tags.remove(tag_id);
        }
        for tag_id in &diff.to_add {
            tags.insert(*tag_id);
        }
        state.write_ops += writes;
        Ok(())
    }

    async fn search(
        &self,
        name: Option<&str>,
        closures: &[HashSet<i64>],
    ) -> Result<Vec<FileWithTags>> {
        let state = self.state.lock().unwrap();

        let mut matches: Vec<FileWithTags> = state
            .files
            .values()
            .filter(|f| match name {
                // Mirrors SQLite's case-insensitive LIKE.
                Some(substring) => f
                    .name
                    .to_lowercase()
                    .contains(&substring.to_lowercase()),
                None => true,
            })
            .filter(|f| {
                let file_tags = state.file_tags.get(&f.id).cloned().unwrap_or_default();
                closures
                    .iter()
                    .all(|closure| !closure.is_disjoint(&file_tags))
            })
            .map(|f| {
                let mut tags: Vec<&Tag> = state
                    .file_tags
                    .get(&f.id)
                    .map(|ids| ids.iter().filter_map(|id| state.tags.get(id)).collect())
                    .unwrap_or_default();
                tags.sort_by_key(|t| t.order);

                FileWithTags {
                    id: f.id,
                    path: f.path.clone(),
                    name: f.name.clone(),
                    created_at: f.created_at,
                    tags: tags
                        .into_iter()
                        .map(|t| TagRef {
                            id: t.id,
                            name: t.name.clone(),
                            color: t.color.clone(),
                        })
                        .collect(),
                }
            })
            .collect();

        matches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matches)
    }
}
