//! [`crate::entity`] contains the entity kinds the archive serves and the record
//! types the admin console edits. Every record carries a numeric identifier unique
//! within its kind; identifiers are newtypes so tables for different kinds cannot
//! be crossed by accident.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Attachments are bucketed on disk by subject id so no single directory grows
/// unbounded. Two path levels, each spanning this many identifiers.
pub const FILES_PER_BUCKET: u32 = 2048;

macro_rules! entity_id {
    ($(#[$docs:meta])* $name:ident) => {
        $(#[$docs])*
        #[derive(
            Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                $name(id)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(PostId);
entity_id!(AuthorId);
entity_id!(CollectionId);
entity_id!(PlatformId);
entity_id!(TagId);
entity_id!(FileMetaId);

/// The closed set of entity kinds the archive knows about.
///
/// Dispatch on this enum must stay exhaustive: adding a kind here is meant to be a
/// compile error in every `match` that has not been updated for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Post,
    Author,
    Collection,
    Platform,
    Tag,
    FileMeta,
}

impl EntityKind {
    /// The plural table-name form used on the wire, e.g. in `PATCH /api/{kind}/{id}`.
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Post => "posts",
            EntityKind::Author => "authors",
            EntityKind::Collection => "collections",
            EntityKind::Platform => "platforms",
            EntityKind::Tag => "tags",
            EntityKind::FileMeta => "file_metas",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

/// The top-level subject entity: a piece of archived content.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumb: Option<FileMetaId>,
    #[serde(default)]
    pub platform: Option<PlatformId>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub thumb: Option<FileMetaId>,
    #[serde(default)]
    pub updated: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub thumb: Option<FileMetaId>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub platform: Option<PlatformId>,
}

/// Selects between the raw on-disk path of an attachment and the display variant
/// served to the UI (image display paths carry a cache-busting suffix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathVariant {
    #[default]
    Display,
    Raw,
}

/// A file attachment. `post` is the identifier of the subject entity the file
/// belongs to and drives the on-disk bucketing scheme.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    pub id: FileMetaId,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub mime: String,
    #[serde(default)]
    pub post: PostId,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl FileMeta {
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// The path this attachment is served from:
    /// `/<category>/<post / 2048>/<post % 2048>/<filename>`.
    ///
    /// The category segment is `images` for image mime types, `resource` for
    /// everything else. [`PathVariant::Display`] appends `?ce` to image paths so
    /// the browser cache is keyed per variant.
    pub fn path(&self, variant: PathVariant) -> String {
        let base = if self.is_image() { "images" } else { "resource" };
        let suffix = if self.is_image() && variant == PathVariant::Display {
            "?ce"
        } else {
            ""
        };
        format!(
            "/{}/{}/{}/{}{}",
            base,
            self.post.0 / FILES_PER_BUCKET,
            self.post.0 % FILES_PER_BUCKET,
            self.filename,
            suffix
        )
    }
}

/// Tagged union over every record type, for code that is polymorphic over the
/// entity kind (thumbnail resolution, list rendering).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum Entity {
    Post(Post),
    Author(Author),
    Collection(Collection),
    Platform(Platform),
    Tag(Tag),
    FileMeta(FileMeta),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Post(_) => EntityKind::Post,
            Entity::Author(_) => EntityKind::Author,
            Entity::Collection(_) => EntityKind::Collection,
            Entity::Platform(_) => EntityKind::Platform,
            Entity::Tag(_) => EntityKind::Tag,
            Entity::FileMeta(_) => EntityKind::FileMeta,
        }
    }

    /// The raw identifier of the wrapped record, unique within its kind.
    pub fn id(&self) -> u32 {
        match self {
            Entity::Post(post) => post.id.0,
            Entity::Author(author) => author.id.0,
            Entity::Collection(collection) => collection.id.0,
            Entity::Platform(platform) => platform.id.0,
            Entity::Tag(tag) => tag.id.0,
            Entity::FileMeta(file) => file.id.0,
        }
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind(), self.id())
    }
}
