//! File registration, tag association, and hierarchy-aware search.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use tagfs_core::{
    diff_tag_sets, Error, FileQuery, FileRepository, FileWithTags, HierarchyGraph, Result,
    TagRepository,
};

/// File service over injected repositories.
#[derive(Clone)]
pub struct FileService {
    files: Arc<dyn FileRepository>,
    tags: Arc<dyn TagRepository>,
}

impl FileService {
    pub fn new(files: Arc<dyn FileRepository>, tags: Arc<dyn TagRepository>) -> Self {
        Self { files, tags }
    }

    /// Register a file under the given tags.
    ///
    /// The path is made absolute; a path already registered is a conflict.
    /// The display name is derived once from the base name without extension
    /// and never changes afterwards.
    pub async fn add(&self, path: &str, tag_ids: &[i64]) -> Result<i64> {
        let abs = std::path::absolute(Path::new(path))
            .map_err(Error::Io)?
            .to_string_lossy()
            .into_owned();

        if self.files.exists_by_path(&abs).await? {
            return Err(Error::Conflict(format!("File '{}' already exists", abs)));
        }

        let mut tag_ids = tag_ids.to_vec();
        tag_ids.sort_unstable();
        tag_ids.dedup();
        for &tag_id in &tag_ids {
            if !self.tags.exists(tag_id).await? {
                return Err(Error::TagNotFound(tag_id));
            }
        }

        let name = Path::new(&abs)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let id = self.files.insert(&abs, &name, &tag_ids).await?;
        debug!(
            subsystem = "api",
            component = "files",
            op = "add",
            file_id = id,
            "File registered"
        );
        Ok(id)
    }

    /// Move a file's tag set to the desired set.
    ///
    /// Applies the minimal add/remove diff as one batch; a desired set equal
    /// to the current one issues no writes at all.
    pub async fn update_tags(&self, id: i64, desired: &[i64]) -> Result<()> {
        if !self.files.exists(id).await? {
            return Err(Error::FileNotFound(id));
        }

        let desired: HashSet<i64> = desired.iter().copied().collect();
        for &tag_id in &desired {
            if !self.tags.exists(tag_id).await? {
                return Err(Error::TagNotFound(tag_id));
            }
        }

        let existing = self.files.tags_of(id).await?;
        let diff = diff_tag_sets(&existing, &desired);
        if diff.is_empty() {
            return Ok(());
        }
        self.files.apply_tag_diff(id, &diff).await
    }

    /// Delete a file by id.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.files.exists(id).await? {
            return Err(Error::FileNotFound(id));
        }
        self.files.delete(id).await
    }

    /// Search files by optional name substring and requested tags.
    ///
    /// Each requested tag is expanded through its descendant closure, so a
    /// broad tag also matches files tagged only with a more specific
    /// descendant. A file must satisfy every requested tag's closure
    /// independently. Any nonexistent requested tag aborts the whole search.
    pub async fn search(&self, query: &FileQuery) -> Result<Vec<FileWithTags>> {
        for &tag_id in &query.tags {
            if !self.tags.exists(tag_id).await? {
                return Err(Error::TagNotFound(tag_id));
            }
        }

        let closures: Vec<HashSet<i64>> = if query.tags.is_empty() {
            Vec::new()
        } else {
            let graph = HierarchyGraph::from_tags(&self.tags.list().await?);
            query.tags.iter().map(|&t| graph.descendants(t)).collect()
        };

        let results = self.files.search(query.name.as_deref(), &closures).await?;
        debug!(
            subsystem = "api",
            component = "files",
            op = "search",
            result_count = results.len(),
            "Search completed"
        );
        Ok(results)
    }

    /// Absolute path of a registered file.
    pub async fn path_of(&self, id: i64) -> Result<String> {
        self.files.path_of(id).await
    }
}
