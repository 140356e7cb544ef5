//! Tag hierarchy service tests against the in-memory fake repository.
//!
//! The service only sees the repository traits, so the fake exercises the
//! full validation path: existence checks, color normalization, and the
//! cycle guard.

use std::sync::Arc;

use tagfs_api::services::TagService;
use tagfs_core::{CreateTagRequest, Error, TagRepository, UpdateTagRequest};
use tagfs_db::test_fixtures::MemoryRepository;

fn service() -> (TagService, MemoryRepository) {
    let repo = MemoryRepository::new();
    let tags: Arc<dyn TagRepository> = Arc::new(repo.clone());
    (TagService::new(tags), repo)
}

fn tag_req(name: &str, color: &str, parent_ids: Vec<i64>) -> CreateTagRequest {
    CreateTagRequest {
        name: name.to_string(),
        color: color.to_string(),
        parent_ids,
    }
}

#[tokio::test]
async fn create_normalizes_color_to_uppercase() {
    let (service, _) = service();

    service.create(tag_req("a", "#ff00aa", vec![])).await.unwrap();

    let tags = service.list().await.unwrap();
    assert_eq!(tags[0].color, "#FF00AA");
}

#[tokio::test]
async fn create_rejects_malformed_color() {
    let (service, _) = service();

    let err = service.create(tag_req("x", "red", vec![])).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(err.to_string().contains("red"));

    // Nothing was written.
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_nonexistent_parent() {
    let (service, _) = service();

    let err = service
        .create(tag_req("orphan", "#123456", vec![41]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TagNotFound(41)));
}

#[tokio::test]
async fn create_allows_multiple_parents() {
    let (service, _) = service();

    let a = service.create(tag_req("a", "#111111", vec![])).await.unwrap();
    let b = service.create(tag_req("b", "#222222", vec![])).await.unwrap();
    let c = service
        .create(tag_req("c", "#333333", vec![a, b]))
        .await
        .unwrap();

    let tags = service.list().await.unwrap();
    let tag_c = tags.iter().find(|t| t.id == c).unwrap();
    let mut parents = tag_c.parent_ids.clone();
    parents.sort_unstable();
    assert_eq!(parents, vec![a, b]);
}

#[tokio::test]
async fn edit_rejects_empty_request() {
    let (service, _) = service();
    let a = service.create(tag_req("a", "#111111", vec![])).await.unwrap();

    let err = service
        .update(a, UpdateTagRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn edit_rejects_unknown_tag() {
    let (service, _) = service();

    let err = service
        .update(
            99,
            UpdateTagRequest {
                name: Some("ghost".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TagNotFound(99)));
}

#[tokio::test]
async fn edit_rejects_direct_self_parent() {
    let (service, _) = service();
    let a = service.create(tag_req("a", "#111111", vec![])).await.unwrap();

    let err = service
        .update(
            a,
            UpdateTagRequest {
                parent_ids: Some(vec![a]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn edit_rejects_cycle_and_keeps_prior_edges() {
    let (service, repo) = service();

    // A <- B: B lists A as parent, so A is an ancestor of B.
    let a = service.create(tag_req("a", "#FF0000", vec![])).await.unwrap();
    let b = service.create(tag_req("b", "#00FF00", vec![a])).await.unwrap();

    let err = service
        .update(
            a,
            UpdateTagRequest {
                parent_ids: Some(vec![b]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    // The rejected edit left both edge sets untouched.
    assert!(repo.parents_of(a).await.unwrap().is_empty());
    assert_eq!(repo.parents_of(b).await.unwrap(), [a].into());
}

#[tokio::test]
async fn edit_rejects_transitive_cycle() {
    let (service, _) = service();

    let a = service.create(tag_req("a", "#111111", vec![])).await.unwrap();
    let b = service.create(tag_req("b", "#222222", vec![a])).await.unwrap();
    let c = service.create(tag_req("c", "#333333", vec![b])).await.unwrap();

    // C descends from A through B; adopting it as A's parent closes a loop.
    let err = service
        .update(
            a,
            UpdateTagRequest {
                parent_ids: Some(vec![c]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn edit_with_empty_set_detaches_all_parents() {
    let (service, repo) = service();

    let a = service.create(tag_req("a", "#111111", vec![])).await.unwrap();
    let b = service.create(tag_req("b", "#222222", vec![a])).await.unwrap();

    service
        .update(
            b,
            UpdateTagRequest {
                parent_ids: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(repo.parents_of(b).await.unwrap().is_empty());
}

#[tokio::test]
async fn edit_reparenting_under_sibling_is_legal() {
    let (service, repo) = service();

    let root = service.create(tag_req("root", "#111111", vec![])).await.unwrap();
    let left = service
        .create(tag_req("left", "#222222", vec![root]))
        .await
        .unwrap();
    let right = service
        .create(tag_req("right", "#333333", vec![root]))
        .await
        .unwrap();

    service
        .update(
            right,
            UpdateTagRequest {
                parent_ids: Some(vec![left]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(repo.parents_of(right).await.unwrap(), [left].into());
}

#[tokio::test]
async fn edit_fields_leave_edges_untouched() {
    let (service, repo) = service();

    let a = service.create(tag_req("a", "#111111", vec![])).await.unwrap();
    let b = service.create(tag_req("b", "#222222", vec![a])).await.unwrap();

    service
        .update(
            b,
            UpdateTagRequest {
                name: Some("renamed".to_string()),
                color: Some("#00ff00".to_string()),
                parent_ids: None,
            },
        )
        .await
        .unwrap();

    let tags = service.list().await.unwrap();
    let tag_b = tags.iter().find(|t| t.id == b).unwrap();
    assert_eq!(tag_b.name, "renamed");
    assert_eq!(tag_b.color, "#00FF00");
    assert_eq!(repo.parents_of(b).await.unwrap(), [a].into());
}

#[tokio::test]
async fn delete_requires_existence() {
    let (service, _) = service();

    let err = service.delete(7).await.unwrap_err();
    assert!(matches!(err, Error::TagNotFound(7)));

    let a = service.create(tag_req("a", "#111111", vec![])).await.unwrap();
    service.delete(a).await.unwrap();
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn reorder_applies_sequence_positions() {
    let (service, _) = service();

    let a = service.create(tag_req("a", "#111111", vec![])).await.unwrap();
    let b = service.create(tag_req("b", "#222222", vec![])).await.unwrap();

    service.reorder(&[b, a]).await.unwrap();

    let ids: Vec<i64> = service.list().await.unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![b, a]);
}
