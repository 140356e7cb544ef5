//! Tag hierarchy service.
//!
//! Public operations to create, edit, delete and reorder tags, enforcing the
//! graph invariants before delegating writes to the repository. The graph is
//! re-read for every edit; the guard never works from a cached closure.

use std::sync::Arc;

use tracing::debug;

use tagfs_core::{
    normalize_color, CreateTagRequest, Error, HierarchyGraph, Result, Tag, TagRepository,
    UpdateTagRequest,
};

/// Tag hierarchy service over an injected repository.
#[derive(Clone)]
pub struct TagService {
    tags: Arc<dyn TagRepository>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }

    /// Create a tag under the given parents.
    ///
    /// Every parent must already exist. No cycle check is needed here: a
    /// brand-new id cannot yet be anyone's ancestor.
    pub async fn create(&self, mut req: CreateTagRequest) -> Result<i64> {
        req.color = normalize_color(&req.color)?;
        req.parent_ids.sort_unstable();
        req.parent_ids.dedup();

        for &parent_id in &req.parent_ids {
            if !self.tags.exists(parent_id).await? {
                return Err(Error::TagNotFound(parent_id));
            }
        }

        let id = self.tags.insert(req).await?;
        debug!(
            subsystem = "api",
            component = "tags",
            op = "create",
            tag_id = id,
            "Tag created"
        );
        Ok(id)
    }

    /// List all tags in display order.
    pub async fn list(&self) -> Result<Vec<Tag>> {
        self.tags.list().await
    }

    /// Edit a tag's name, color and/or parent set.
    ///
    /// At least one field must be present. A present parent set (including
    /// the empty set, which detaches all parents) passes the cycle guard and
    /// then replaces the previous edge set wholesale; a rejected request
    /// leaves the prior edges unchanged.
    pub async fn update(&self, id: i64, req: UpdateTagRequest) -> Result<()> {
        if req.is_empty() {
            return Err(Error::InvalidInput("no change specified".to_string()));
        }
        if !self.tags.exists(id).await? {
            return Err(Error::TagNotFound(id));
        }

        let color = match req.color {
            Some(ref c) => Some(normalize_color(c)?),
            None => None,
        };

        let parents = match req.parent_ids {
            Some(mut parent_ids) => {
                parent_ids.sort_unstable();
                parent_ids.dedup();

                let graph = HierarchyGraph::from_tags(&self.tags.list().await?);
                graph.validate_parents(id, &parent_ids)?;
                Some(parent_ids)
            }
            None => None,
        };

        if req.name.is_some() || color.is_some() {
            self.tags
                .update_fields(id, req.name.as_deref(), color.as_deref())
                .await?;
        }
        if let Some(parent_ids) = parents {
            self.tags.replace_parents(id, &parent_ids).await?;
        }

        Ok(())
    }

    /// Delete a tag by id.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.tags.exists(id).await? {
            return Err(Error::TagNotFound(id));
        }
        self.tags.delete(id).await
    }

    /// Assign display order by position in the given sequence.
    pub async fn reorder(&self, ordered_ids: &[i64]) -> Result<()> {
        self.tags.reorder(ordered_ids).await
    }
}
