//! The tag hierarchy graph.
//!
//! Tags and their parent edges form a DAG: an edge points from a tag to one
//! of its parents, and a tag may have several parents. The graph is rebuilt
//! from the stored tag list on every call that needs it — closures are never
//! cached across calls, since the hierarchy mutates between calls and stale
//! closures would defeat the cycle guard.
//!
//! Closure queries run as iterative worklist traversals with a visited set,
//! so they terminate in O(V+E) even if the stored edge set were ever cyclic.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{Error, Result};
use crate::models::Tag;

/// Id-indexed adjacency view of the tag DAG.
#[derive(Debug, Clone)]
pub struct HierarchyGraph {
    parents: HashMap<i64, Vec<i64>>,
    children: HashMap<i64, Vec<i64>>,
}

impl HierarchyGraph {
    /// Build the graph from a stored tag list.
    pub fn from_tags(tags: &[Tag]) -> Self {
        let mut parents: HashMap<i64, Vec<i64>> = HashMap::with_capacity(tags.len());
        let mut children: HashMap<i64, Vec<i64>> = HashMap::with_capacity(tags.len());

        for tag in tags {
            parents.entry(tag.id).or_default();
            children.entry(tag.id).or_default();
        }
        for tag in tags {
            for &parent_id in &tag.parent_ids {
                parents.entry(tag.id).or_default().push(parent_id);
                children.entry(parent_id).or_default().push(tag.id);
            }
        }

        Self { parents, children }
    }

    /// Whether a tag id is present in the graph.
    pub fn contains(&self, id: i64) -> bool {
        self.parents.contains_key(&id)
    }

    /// The ancestor closure of `id`: the tag itself plus every tag reachable
    /// by following parent edges forward.
    pub fn ancestors(&self, id: i64) -> HashSet<i64> {
        Self::closure(&self.parents, id)
    }

    /// The descendant closure of `id`: the tag itself plus every tag from
    /// which a chain of parent edges leads to `id`.
    pub fn descendants(&self, id: i64) -> HashSet<i64> {
        Self::closure(&self.children, id)
    }

    /// Validate a prospective parent-edge set for `tag_id`.
    ///
    /// Rejects nonexistent parents, direct self-parenting, and any parent
    /// whose ancestor closure already contains `tag_id` — attaching such a
    /// parent would make `tag_id` its own ancestor.
    pub fn validate_parents(&self, tag_id: i64, parent_ids: &[i64]) -> Result<()> {
        for &parent_id in parent_ids {
            if !self.contains(parent_id) {
                return Err(Error::TagNotFound(parent_id));
            }
            if parent_id == tag_id {
                return Err(Error::Conflict(format!(
                    "Circular reference: tag '{}' cannot have itself as parent",
                    tag_id
                )));
            }
            if self.ancestors(parent_id).contains(&tag_id) {
                return Err(Error::Conflict(format!(
                    "Circular reference: tag '{}' descends from tag '{}'",
                    parent_id, tag_id
                )));
            }
        }
        Ok(())
    }

    fn closure(edges: &HashMap<i64, Vec<i64>>, seed: i64) -> HashSet<i64> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        visited.insert(seed);
        queue.push_back(seed);

        while let Some(current) = queue.pop_front() {
            if let Some(neighbors) = edges.get(&current) {
                for &next in neighbors {
                    if visited.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        visited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tag(id: i64, parent_ids: Vec<i64>) -> Tag {
        Tag {
            id,
            name: format!("tag-{}", id),
            color: "#336699".to_string(),
            parent_ids,
            order: id,
            created_at: Utc::now(),
        }
    }

    /// Diamond: 1 at the top, 2 and 3 below it, 4 below both 2 and 3.
    fn diamond() -> HierarchyGraph {
        HierarchyGraph::from_tags(&[
            tag(1, vec![]),
            tag(2, vec![1]),
            tag(3, vec![1]),
            tag(4, vec![2, 3]),
        ])
    }

    #[test]
    fn closures_include_the_seed_itself() {
        let g = diamond();
        assert!(g.ancestors(1).contains(&1));
        assert!(g.descendants(4).contains(&4));
    }

    #[test]
    fn descendants_follow_parent_edges_backwards() {
        let g = diamond();
        assert_eq!(g.descendants(1), HashSet::from([1, 2, 3, 4]));
        assert_eq!(g.descendants(2), HashSet::from([2, 4]));
        assert_eq!(g.descendants(4), HashSet::from([4]));
    }

    #[test]
    fn ancestors_follow_parent_edges_forward() {
        let g = diamond();
        assert_eq!(g.ancestors(4), HashSet::from([4, 2, 3, 1]));
        assert_eq!(g.ancestors(2), HashSet::from([2, 1]));
        assert_eq!(g.ancestors(1), HashSet::from([1]));
    }

    #[test]
    fn multi_parent_node_reaches_both_branches() {
        let g = diamond();
        assert!(g.ancestors(4).contains(&2));
        assert!(g.ancestors(4).contains(&3));
    }

    #[test]
    fn unknown_id_yields_singleton_closure() {
        let g = diamond();
        assert_eq!(g.descendants(99), HashSet::from([99]));
    }

    #[test]
    fn validate_rejects_missing_parent() {
        let g = diamond();
        match g.validate_parents(2, &[99]) {
            Err(Error::TagNotFound(99)) => {}
            other => panic!("expected TagNotFound(99), got {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_self_parent() {
        let g = diamond();
        assert!(matches!(
            g.validate_parents(2, &[2]),
            Err(Error::Conflict(_))
        ));
    }

    #[test]
    fn validate_rejects_descendant_as_parent() {
        let g = diamond();
        // 4 descends from 1 through both branches; 1 adopting 4 as parent
        // would close the loop.
        assert!(matches!(
            g.validate_parents(1, &[4]),
            Err(Error::Conflict(_))
        ));
    }

    #[test]
    fn validate_leaves_prior_edges_alone_on_rejection() {
        let g = diamond();
        let before = g.ancestors(4);
        let _ = g.validate_parents(1, &[4]);
        assert_eq!(g.ancestors(4), before);
    }

    #[test]
    fn validate_accepts_reparenting_and_detach() {
        let g = diamond();
        assert!(g.validate_parents(3, &[2]).is_ok());
        assert!(g.validate_parents(4, &[]).is_ok());
    }

    #[test]
    fn traversal_terminates_on_pathological_cycle() {
        // The guard in validate_parents keeps this out of the store, but the
        // traversal must still terminate if such data ever existed.
        let g = HierarchyGraph::from_tags(&[tag(1, vec![2]), tag(2, vec![1])]);
        assert_eq!(g.ancestors(1), HashSet::from([1, 2]));
        assert_eq!(g.descendants(2), HashSet::from([1, 2]));
    }
}
