//! Integration tests for the SQLite tag repository.

use tagfs_core::{CreateTagRequest, TagRepository};
use tagfs_db::test_fixtures::TestDatabase;

fn tag_req(name: &str, color: &str, parent_ids: Vec<i64>) -> CreateTagRequest {
    CreateTagRequest {
        name: name.to_string(),
        color: color.to_string(),
        parent_ids,
    }
}

#[tokio::test]
async fn insert_assigns_monotonic_order() {
    let test_db = TestDatabase::new().await;
    let tags = &test_db.db.tags;

    tags.insert(tag_req("alpha", "#FF0000", vec![])).await.unwrap();
    tags.insert(tag_req("beta", "#00FF00", vec![])).await.unwrap();
    tags.insert(tag_req("gamma", "#0000FF", vec![])).await.unwrap();

    let listed = tags.list().await.unwrap();
    let orders: Vec<i64> = listed.iter().map(|t| t.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[tokio::test]
async fn list_aggregates_multiple_parents() {
    let test_db = TestDatabase::new().await;
    let tags = &test_db.db.tags;

    let a = tags.insert(tag_req("a", "#111111", vec![])).await.unwrap();
    let b = tags.insert(tag_req("b", "#222222", vec![])).await.unwrap();
    let c = tags
        .insert(tag_req("c", "#333333", vec![a, b]))
        .await
        .unwrap();

    let listed = tags.list().await.unwrap();
    assert_eq!(listed.len(), 3);

    let tag_c = listed.iter().find(|t| t.id == c).unwrap();
    let mut parents = tag_c.parent_ids.clone();
    parents.sort_unstable();
    assert_eq!(parents, vec![a, b]);
}

#[tokio::test]
async fn exists_reflects_insert_and_delete() {
    let test_db = TestDatabase::new().await;
    let tags = &test_db.db.tags;

    let id = tags.insert(tag_req("x", "#ABCDEF", vec![])).await.unwrap();
    assert!(tags.exists(id).await.unwrap());
    assert!(!tags.exists(id + 100).await.unwrap());

    tags.delete(id).await.unwrap();
    assert!(!tags.exists(id).await.unwrap());
}

#[tokio::test]
async fn update_fields_touches_only_requested_fields() {
    let test_db = TestDatabase::new().await;
    let tags = &test_db.db.tags;

    let id = tags
        .insert(tag_req("before", "#AAAAAA", vec![]))
        .await
        .unwrap();

    tags.update_fields(id, Some("after"), None).await.unwrap();
    let listed = tags.list().await.unwrap();
    assert_eq!(listed[0].name, "after");
    assert_eq!(listed[0].color, "#AAAAAA");

    tags.update_fields(id, None, Some("#BBBBBB")).await.unwrap();
    let listed = tags.list().await.unwrap();
    assert_eq!(listed[0].name, "after");
    assert_eq!(listed[0].color, "#BBBBBB");
}

#[tokio::test]
async fn replace_parents_is_unconditional_replacement() {
    let test_db = TestDatabase::new().await;
    let tags = &test_db.db.tags;

    let a = tags.insert(tag_req("a", "#111111", vec![])).await.unwrap();
    let b = tags.insert(tag_req("b", "#222222", vec![])).await.unwrap();
    let c = tags.insert(tag_req("c", "#333333", vec![a])).await.unwrap();

    tags.replace_parents(c, &[b]).await.unwrap();
    assert_eq!(tags.parents_of(c).await.unwrap(), [b].into());

    tags.replace_parents(c, &[]).await.unwrap();
    assert!(tags.parents_of(c).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_cascades_edges_to_children() {
    let test_db = TestDatabase::new().await;
    let tags = &test_db.db.tags;

    let parent = tags.insert(tag_req("p", "#111111", vec![])).await.unwrap();
    let child = tags
        .insert(tag_req("c", "#222222", vec![parent]))
        .await
        .unwrap();

    assert_eq!(tags.children_of(parent).await.unwrap(), [child].into());

    tags.delete(parent).await.unwrap();

    // The child survives; only its edge to the deleted parent is gone.
    assert!(tags.exists(child).await.unwrap());
    assert!(tags.parents_of(child).await.unwrap().is_empty());
}

#[tokio::test]
async fn reorder_assigns_positions_in_sequence() {
    let test_db = TestDatabase::new().await;
    let tags = &test_db.db.tags;

    let a = tags.insert(tag_req("a", "#111111", vec![])).await.unwrap();
    let b = tags.insert(tag_req("b", "#222222", vec![])).await.unwrap();
    let c = tags.insert(tag_req("c", "#333333", vec![])).await.unwrap();

    tags.reorder(&[c, a, b]).await.unwrap();

    let listed = tags.list().await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![c, a, b]);
}

#[tokio::test]
async fn single_hop_queries_do_not_traverse() {
    let test_db = TestDatabase::new().await;
    let tags = &test_db.db.tags;

    let top = tags.insert(tag_req("top", "#111111", vec![])).await.unwrap();
    let mid = tags
        .insert(tag_req("mid", "#222222", vec![top]))
        .await
        .unwrap();
    let leaf = tags
        .insert(tag_req("leaf", "#333333", vec![mid]))
        .await
        .unwrap();

    assert_eq!(tags.children_of(top).await.unwrap(), [mid].into());
    assert_eq!(tags.parents_of(leaf).await.unwrap(), [mid].into());
}
