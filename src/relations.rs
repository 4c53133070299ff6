//! The session-wide relation cache.
//!
//! Entities arrive from the API denormalized: a fetched post carries the authors,
//! tags, platform, and file attachments it references as a [`RelationBundle`]. The
//! cache indexes those related entities by identifier and merges every bundle into
//! one shared table set, so two unrelated views that reference the same author
//! agree on its record.
//!
//! [`RelationCache`] is a cloneable handle to the one table set of the session.
//! The sharing is deliberate and explicit in the type: any holder calling
//! [`RelationCache::merge`] or [`RelationCache::clear`] affects every view.

use parking_lot::{ArcRwLockReadGuard, Mutex, RawRwLock, RwLock};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::{collections::BTreeMap, fmt, sync::Arc};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    entity::{
        Author, AuthorId, Collection, CollectionId, Entity, FileMeta, FileMetaId, PathVariant,
        Platform, PlatformId, Tag, TagId,
    },
    event::{CacheEvent, Event},
    CuratorError,
};

/// An ingest unit: zero-or-more arrays of related entities, one per kind, as they
/// accompany a fetched subject entity. Bundles may be partial; absent kinds are
/// treated as empty.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationBundle {
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub file_metas: Vec<FileMeta>,
}

impl RelationBundle {
    /// Validate a raw JSON bundle into typed form. This is the drift-detection
    /// boundary with the API:
    ///
    /// - a top-level key that is not a known entity kind is a
    ///   [`CuratorError::UnknownKind`] error;
    /// - an entity object without an `id` is a [`CuratorError::MissingIdentifier`]
    ///   error.
    ///
    /// Neither is defaulted or dropped, since both indicate a schema mismatch that
    /// must be fixed at the source.
    pub fn from_value(value: Value) -> Result<RelationBundle, CuratorError> {
        let Value::Object(map) = value else {
            return Err(CuratorError::Serialization(format!(
                "Relation bundle must be a JSON object, got {value}"
            )));
        };

        let mut bundle = RelationBundle::default();
        for (kind, entities) in map {
            match kind.as_str() {
                "authors" => bundle.authors = parse_entities(&kind, entities)?,
                "collections" => bundle.collections = parse_entities(&kind, entities)?,
                "platforms" => bundle.platforms = parse_entities(&kind, entities)?,
                "tags" => bundle.tags = parse_entities(&kind, entities)?,
                "file_metas" => bundle.file_metas = parse_entities(&kind, entities)?,
                _ => return Err(CuratorError::UnknownKind(kind)),
            }
        }
        Ok(bundle)
    }

    /// Total number of entities across every kind.
    pub fn len(&self) -> usize {
        self.authors.len()
            + self.collections.len()
            + self.platforms.len()
            + self.tags.len()
            + self.file_metas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_entities<T: DeserializeOwned>(
    kind: &str,
    entities: Value,
) -> Result<Vec<T>, CuratorError> {
    let Value::Array(entities) = entities else {
        // A null kind array is the same as an absent one.
        if entities.is_null() {
            return Ok(Vec::new());
        }
        return Err(CuratorError::Serialization(format!(
            "Relation bundle kind '{kind}' must be an array, got {entities}"
        )));
    };

    entities
        .into_iter()
        .map(|entity| {
            let has_id = entity
                .as_object()
                .is_some_and(|fields| fields.contains_key("id"));
            if !has_id {
                return Err(CuratorError::MissingIdentifier(format!("{kind}: {entity}")));
            }
            Ok(serde_json::from_value(entity)?)
        })
        .collect()
}

/// The identifier-keyed tables, one per related entity kind. Records are not
/// versioned; the most recently merged record for an identifier wins.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationTables {
    pub authors: BTreeMap<AuthorId, Author>,
    pub collections: BTreeMap<CollectionId, Collection>,
    pub platforms: BTreeMap<PlatformId, Platform>,
    pub tags: BTreeMap<TagId, Tag>,
    pub file_metas: BTreeMap<FileMetaId, FileMeta>,
}

impl RelationTables {
    pub fn len(&self) -> usize {
        self.authors.len()
            + self.collections.len()
            + self.platforms.len()
            + self.tags.len()
            + self.file_metas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn merge(&mut self, bundle: &RelationBundle) {
        for author in &bundle.authors {
            self.authors.insert(author.id, author.clone());
        }
        for collection in &bundle.collections {
            self.collections.insert(collection.id, collection.clone());
        }
        for platform in &bundle.platforms {
            self.platforms.insert(platform.id, platform.clone());
        }
        for tag in &bundle.tags {
            self.tags.insert(tag.id, tag.clone());
        }
        for file in &bundle.file_metas {
            self.file_metas.insert(file.id, file.clone());
        }
    }

    fn clear(&mut self) {
        self.authors.clear();
        self.collections.clear();
        self.platforms.clear();
        self.tags.clear();
        self.file_metas.clear();
    }
}

/// Cloneable handle to the single shared table set of the session.
///
/// Created once at startup and passed explicitly to every component that resolves
/// relations. Clones share state: a merge through one handle is visible through
/// all of them, and [`RelationCache::clear`] is a global reset, not scoped to the
/// clearing view. Entries are only ever upserted, never evicted, outside `clear`.
#[derive(Debug, Clone, Default)]
pub struct RelationCache {
    tables: Arc<RwLock<RelationTables>>,
    observers: Arc<Mutex<Vec<UnboundedSender<Event>>>>,
}

impl RelationCache {
    pub fn new() -> RelationCache {
        RelationCache::default()
    }

    /// Upsert every entity in `bundle` into its table, keyed by identifier.
    /// Idempotent: merging the same bundle twice leaves the tables as after one
    /// merge. Across calls, last write wins; there is no version comparison.
    ///
    /// The write lock is held for the whole bundle, so no reader observes a
    /// partially-applied merge.
    pub fn merge(&self, bundle: &RelationBundle) {
        {
            let mut tables = self.tables.write();
            tables.merge(bundle);
        }
        tracing::debug!(
            "[RelationCache] Merged bundle with {} entities",
            bundle.len()
        );
        self.notify(CacheEvent::Merged {
            entities: bundle.len(),
        });
    }

    /// Validate a raw JSON bundle ([`RelationBundle::from_value`]) and merge it.
    pub fn merge_value(&self, value: Value) -> Result<(), CuratorError> {
        let bundle = RelationBundle::from_value(value)?;
        self.merge(&bundle);
        Ok(())
    }

    /// Empty every table. Global: affects all current and future holders of the
    /// cache, including views that merged the entries being dropped.
    pub fn clear(&self) {
        {
            let mut tables = self.tables.write();
            tables.clear();
        }
        tracing::debug!("[RelationCache] Cleared all relation tables");
        self.notify(CacheEvent::Cleared);
    }

    /// Read access to the live, shared tables. This is a view of the one table
    /// set, never a copy; drop the guard before calling a mutating operation.
    pub fn tables(&self) -> ArcRwLockReadGuard<RawRwLock, RelationTables> {
        self.tables.read_arc()
    }

    /// Resolve an attachment identifier to the path it is served from. `None` when
    /// the identifier is absent (entities without a thumbnail pass `None` straight
    /// through) or not present in the file table.
    pub fn file_path(&self, id: Option<FileMetaId>, variant: PathVariant) -> Option<String> {
        let tables = self.tables.read();
        id.and_then(|id| tables.file_metas.get(&id))
            .map(|file| file.path(variant))
    }

    /// Resolve the displayable thumbnail for an entity, polymorphic over its kind:
    /// attachments resolve to their own path when they are images; posts, authors,
    /// and collections resolve their `thumb` identifier through the file table;
    /// tags and platforms never have a thumbnail.
    pub fn thumbnail(&self, entity: &Entity) -> Option<String> {
        match entity {
            Entity::FileMeta(file) => file.is_image().then(|| file.path(PathVariant::Display)),
            Entity::Post(post) => self.file_path(post.thumb, PathVariant::Display),
            Entity::Author(author) => self.file_path(author.thumb, PathVariant::Display),
            Entity::Collection(collection) => {
                self.file_path(collection.thumb, PathVariant::Display)
            }
            Entity::Tag(_) => None,
            Entity::Platform(_) => None,
        }
    }

    /// Register an observer. Each merge/clear sends one [`Event::Cache`] on every
    /// subscribed channel, after the mutation is applied.
    pub fn subscribe(&self, sender: UnboundedSender<Event>) {
        self.observers.lock().push(sender);
    }

    fn notify(&self, event: CacheEvent) {
        self.observers.lock().retain(|observer| {
            match observer.send(Event::Cache(event.clone())) {
                Ok(()) => true,
                Err(_) => {
                    tracing::trace!("Dropping closed cache observer");
                    false
                }
            }
        });
    }
}

impl fmt::Display for RelationCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.tables.read();
        write!(
            f,
            "RelationCache({} authors, {} collections, {} platforms, {} tags, {} files)",
            tables.authors.len(),
            tables.collections.len(),
            tables.platforms.len(),
            tables.tags.len(),
            tables.file_metas.len()
        )
    }
}
