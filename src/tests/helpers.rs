//! Shared fixtures for draft and relation-cache tests.

use crate::entity::{
    Author, AuthorId, Collection, CollectionId, FileMeta, FileMetaId, Platform, PlatformId, Post,
    PostId, Tag, TagId,
};
use crate::relations::RelationBundle;

pub fn test_author(id: u32, name: &str, thumb: Option<u32>) -> Author {
    Author {
        id: AuthorId(id),
        name: name.to_string(),
        thumb: thumb.map(FileMetaId),
        updated: None,
    }
}

pub fn test_file(id: u32, post: u32, filename: &str, mime: &str) -> FileMeta {
    FileMeta {
        id: FileMetaId(id),
        filename: filename.to_string(),
        mime: mime.to_string(),
        post: PostId(post),
        ..Default::default()
    }
}

pub fn test_post(id: u32, title: &str, thumb: Option<u32>) -> Post {
    Post {
        id: PostId(id),
        title: title.to_string(),
        thumb: thumb.map(FileMetaId),
        ..Default::default()
    }
}

/// A bundle touching every kind, the shape a fetched post arrives with.
pub fn full_bundle() -> RelationBundle {
    RelationBundle {
        authors: vec![test_author(1, "ada", Some(7))],
        collections: vec![Collection {
            id: CollectionId(2),
            name: "favorites".to_string(),
            ..Default::default()
        }],
        platforms: vec![Platform {
            id: PlatformId(3),
            name: "usenet".to_string(),
        }],
        tags: vec![Tag {
            id: TagId(4),
            name: "retro".to_string(),
            platform: Some(PlatformId(3)),
        }],
        file_metas: vec![
            test_file(7, 4096, "a.png", "image/png"),
            test_file(8, 5, "doc.pdf", "application/pdf"),
        ],
    }
}
