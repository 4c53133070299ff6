use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Notification that a [`crate::draft::Draft`] mutated. Events are emitted *after*
/// the mutation is applied, so a subscriber that reads back through the draft always
/// observes the state the event describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftEvent {
    /// A field was staged into the pending change set. Carries the field name.
    FieldSet(String),
    /// Pending changes were folded into the snapshot and cleared.
    Committed,
    /// Pending changes were dropped; the snapshot is untouched.
    Discarded,
    /// The snapshot was replaced by an authoritative record; pending changes cleared.
    Replaced,
}

/// Notification that the shared [`crate::relations::RelationCache`] mutated.
/// Cache events are global: every view holding a handle sees the same tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheEvent {
    /// A relation bundle was merged. Carries the number of entities upserted.
    Merged { entities: usize },
    /// Every table was emptied.
    Cleared,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    #[default]
    Ping,
    Draft(DraftEvent),
    Cache(CacheEvent),
}

impl Display for DraftEvent {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            DraftEvent::FieldSet(key) => write!(f, "FieldSet({key})"),
            DraftEvent::Committed => write!(f, "Committed"),
            DraftEvent::Discarded => write!(f, "Discarded"),
            DraftEvent::Replaced => write!(f, "Replaced"),
        }
    }
}

impl Display for CacheEvent {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            CacheEvent::Merged { entities } => write!(f, "Merged({entities})"),
            CacheEvent::Cleared => write!(f, "Cleared"),
        }
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Event::Ping => write!(f, "Ping"),
            Event::Draft(event) => write!(f, "Draft::{event}"),
            Event::Cache(event) => write!(f, "Cache::{event}"),
        }
    }
}
