//! End-to-end exercise of the data layer the way the console uses it: fetch a
//! denormalized post, merge its relations into the shared cache, edit the post
//! through a draft, send the change set, and reconcile the server's answer.

mod common;

use common::{init_logging, post_response};
use serde_json::{json, Value};
use test_log::test;

use curator_core::draft::Draft;
use curator_core::entity::{Entity, EntityKind, FileMetaId, PathVariant, Post};
use curator_core::relations::RelationCache;

#[test]
fn edit_session_round_trip() {
    init_logging();

    // One cache for the session; each view gets a clone of the handle.
    let cache = RelationCache::new();
    let list_view = cache.clone();
    let detail_view = cache.clone();

    // The detail view fetched a post; its relations land in the shared cache.
    let (raw_post, relations) = post_response();
    detail_view.merge_value(relations).unwrap();

    let post: Post = serde_json::from_value(raw_post.clone()).unwrap();
    assert_eq!(
        detail_view.thumbnail(&Entity::Post(post.clone())),
        Some("/images/0/42/engine.png?ce".to_string())
    );
    // The list view resolves the same attachment identically.
    assert_eq!(
        list_view.file_path(Some(FileMetaId(7)), PathVariant::Raw),
        Some("/images/0/42/engine.png".to_string())
    );

    // Operator edits the title and picks a different thumbnail.
    let mut draft = Draft::wrap(&post).unwrap();
    draft.set("title", "the difference engine, revisited").unwrap();
    draft.set("thumb", 8).unwrap();
    assert!(draft.has_changes());

    // The PATCH body is exactly the sparse diff, targeted by kind and id.
    let body = Value::Object(draft.changes().clone());
    assert_eq!(
        body,
        json!({"title": "the difference engine, revisited", "thumb": 8})
    );
    let route = format!("/api/{}/{}", EntityKind::Post, post.id);
    assert_eq!(route, "/api/posts/42");

    // Server accepted the patch; fold the edits into the snapshot.
    draft.commit();
    assert!(!draft.has_changes());
    let updated: Post = draft.to_record().unwrap();
    assert_eq!(updated.title, "the difference engine, revisited");
    assert_eq!(updated.thumb, Some(FileMetaId(8)));
    assert_eq!(updated.id, post.id);

    // Both views still agree on the relation tables.
    assert_eq!(list_view.tables().authors.len(), 2);
    assert_eq!(*detail_view.tables(), *list_view.tables());
}

#[test]
fn stale_edits_are_recoverable() {
    init_logging();

    let (raw_post, _relations) = post_response();
    let mut draft = Draft::wrap(&raw_post).unwrap();

    // A discarded edit leaves no trace.
    draft.set("title", "typo").unwrap();
    draft.discard();
    assert_eq!(draft.get("title").unwrap(), "introducing the difference engine");

    // A refetch replaces the snapshot wholesale, dropping pending edits with it.
    draft.set("title", "never sent").unwrap();
    let mut refreshed = raw_post.clone();
    refreshed["title"] = json!("renamed on another machine");
    draft.replace(&refreshed).unwrap();
    assert!(!draft.has_changes());
    assert_eq!(draft.get("title").unwrap(), "renamed on another machine");
}

#[test]
fn session_reset_clears_every_view() {
    init_logging();

    let cache = RelationCache::new();
    let other_view = cache.clone();
    let (_, relations) = post_response();
    cache.merge_value(relations).unwrap();
    assert!(!cache.tables().is_empty());

    // Reset from one view empties the tables for all of them.
    other_view.clear();
    assert!(cache.tables().is_empty());
    assert_eq!(cache.file_path(Some(FileMetaId(7)), PathVariant::Raw), None);
}
