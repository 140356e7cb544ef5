//! Repository traits for tagfs abstractions.
//!
//! These traits define the store contract the services operate against,
//! enabling pluggable backends and testability. The store guarantees that
//! every multi-write method applies its writes as a single atomic batch:
//! all of them, or none.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::assoc::TagDiff;
use crate::error::Result;
use crate::models::{CreateTagRequest, FileWithTags, Tag};

/// Repository for tag rows and parent edges.
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Check if a tag exists.
    async fn exists(&self, id: i64) -> Result<bool>;

    /// List all tags with their parent ids, ordered by display order.
    async fn list(&self) -> Result<Vec<Tag>>;

    /// Insert a tag row with the next order value plus one parent edge per
    /// entry, atomically. Returns the assigned id.
    async fn insert(&self, req: CreateTagRequest) -> Result<i64>;

    /// Update name and/or color in place. Parent edges are untouched.
    async fn update_fields(&self, id: i64, name: Option<&str>, color: Option<&str>) -> Result<()>;

    /// Atomically replace the full parent-edge set for a tag
    /// (delete-all-then-insert, unconditional replacement).
    async fn replace_parents(&self, id: i64, parent_ids: &[i64]) -> Result<()>;

    /// Delete a tag row. Edges referencing the id are cleaned up by the
    /// store's referential rules.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Assign display order `i` to each id in sequence, in one transaction.
    async fn reorder(&self, ordered_ids: &[i64]) -> Result<()>;

    /// Single-hop parent ids of a tag.
    async fn parents_of(&self, id: i64) -> Result<HashSet<i64>>;

    /// Single-hop child ids of a tag.
    async fn children_of(&self, id: i64) -> Result<HashSet<i64>>;
}

/// Repository for file rows and file-tag associations.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Check if a file exists.
    async fn exists(&self, id: i64) -> Result<bool>;

    /// Check if a file with the given path exists.
    async fn exists_by_path(&self, path: &str) -> Result<bool>;

    /// Insert a file row plus one tag association per entry, atomically.
    /// Returns the assigned id.
    async fn insert(&self, path: &str, name: &str, tag_ids: &[i64]) -> Result<i64>;

    /// Delete a file row; its tag associations go with it.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Look up a file id by its path.
    async fn id_of_path(&self, path: &str) -> Result<i64>;

    /// Look up a file's path by id.
    async fn path_of(&self, id: i64) -> Result<String>;

    /// The file's direct tag id set.
    async fn tags_of(&self, id: i64) -> Result<HashSet<i64>>;

    /// Apply an association diff as one atomic batch. An empty diff writes
    /// nothing.
    async fn apply_tag_diff(&self, id: i64, diff: &TagDiff) -> Result<()>;

    /// Search files. `name` is a substring filter on the stored file name;
    /// `closures` holds one descendant-closure set per requested tag, and a
    /// file matches only when its own tag set intersects every closure
    /// independently. Results carry their full resolved tag lists and are
    /// ordered by file name.
    async fn search(
        &self,
        name: Option<&str>,
        closures: &[HashSet<i64>],
    ) -> Result<Vec<FileWithTags>>;
}
