//! Domain models for tagfs.
//!
//! Tags form a directed acyclic graph: a tag may carry any number of parent
//! edges, including several at once. Files carry flat tag sets; hierarchy
//! awareness happens at query time through closure expansion, never by
//! copying attributes between tags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A classification tag, positioned in the hierarchy via its parent ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    /// `#RRGGBB`, stored uppercase.
    pub color: String,
    /// Parent tag ids; empty for top-level tags, may hold several entries.
    pub parent_ids: Vec<i64>,
    /// Sibling display order, assigned as max+1 at creation.
    pub order: i64,
    pub created_at: DateTime<Utc>,
}

/// Minimal tag projection attached to search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub id: i64,
    pub name: String,
    pub color: String,
}

/// A registered file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    pub id: i64,
    /// Absolute filesystem path, unique across all files.
    pub path: String,
    /// Base name without extension, derived once at registration.
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A file together with its resolved tag list, as returned by search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileWithTags {
    pub id: i64,
    pub path: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<TagRef>,
}

/// Request for creating a new tag.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub parent_ids: Vec<i64>,
}

/// Request for editing a tag. All fields independently optional; at least one
/// must be present. `parent_ids: Some(vec![])` detaches every parent, while
/// `None` leaves the edge set untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub parent_ids: Option<Vec<i64>>,
}

impl UpdateTagRequest {
    /// True when the request carries no change at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.parent_ids.is_none()
    }
}

/// Request for registering a file.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFileRequest {
    pub path: String,
    #[serde(default)]
    pub tags: Vec<i64>,
}

/// A file search query. Both filters optional; an empty query matches all
/// files. Each requested tag is expanded through its descendant closure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileQuery {
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<i64>,
}
