//! Change tracking for records being edited in the console.
//!
//! A [`Draft`] wraps the last server-confirmed value of a record (the *snapshot*)
//! and accumulates edits into a sparse *change set* that overlays the snapshot on
//! reads. The snapshot is never mutated by an edit, so the change set can be sent
//! to the server as a minimal `PATCH` body, folded into the snapshot once the
//! server confirms ([`Draft::commit`]), or thrown away ([`Draft::discard`]) without
//! a re-fetch.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    event::{DraftEvent, Event},
    CuratorError,
};

/// Field names reserved for the draft's own snapshot/diff storage. Writes to these
/// are rejected so a malformed caller cannot corrupt the wrapper's internal state.
pub const RESERVED_FIELDS: [&str; 2] = ["_raw", "changes"];

/// A record under edit: `{ snapshot, changes }` plus overlay accessors.
///
/// Reads ([`Draft::get`]) see the change set first and fall back to the snapshot;
/// writes ([`Draft::set`]) only ever touch the change set. The draft is exclusively
/// owned by the view that created it and all operations run to completion under
/// `&mut self`, so readers can never observe a partially-applied commit.
#[derive(Debug)]
pub struct Draft {
    snapshot: Map<String, Value>,
    changes: Map<String, Value>,
    observers: Vec<UnboundedSender<Event>>,
}

impl Draft {
    /// Wrap a record. The record is deep-copied through its JSON form, so the
    /// caller's original is never aliased or mutated by the draft.
    ///
    /// Fails with [`CuratorError::Serialization`] when the record does not
    /// serialize to a JSON object.
    pub fn wrap<T: Serialize>(record: &T) -> Result<Draft, CuratorError> {
        Ok(Draft {
            snapshot: to_object(record)?,
            changes: Map::new(),
            observers: Vec::new(),
        })
    }

    /// Read a field through the overlay: the pending change if one exists, else the
    /// snapshot value. A key present in neither is a [`CuratorError::NoSuchField`]
    /// error; there is no silent "absent" marker.
    pub fn get(&self, key: &str) -> Result<&Value, CuratorError> {
        self.changes
            .get(key)
            .or_else(|| self.snapshot.get(key))
            .ok_or_else(|| CuratorError::NoSuchField(key.to_string()))
    }

    /// Stage a field edit. Inserts into the change set only; the snapshot is
    /// untouched. Observers are notified synchronously after the insert, so by the
    /// time an observer runs, a read of `key` already returns `value`.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<(), CuratorError> {
        if RESERVED_FIELDS.contains(&key) {
            return Err(CuratorError::InvalidField(key.to_string()));
        }
        self.changes.insert(key.to_string(), value.into());
        self.notify(DraftEvent::FieldSet(key.to_string()));
        Ok(())
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// The sparse change set: exactly the fields edited since the last commit,
    /// discard, or replace. This is the `PATCH` body callers send to the server.
    pub fn changes(&self) -> &Map<String, Value> {
        &self.changes
    }

    /// The last confirmed value, without pending edits.
    pub fn snapshot(&self) -> &Map<String, Value> {
        &self.snapshot
    }

    /// Fold the change set into the snapshot (pending values win on collision) and
    /// clear it. A second commit with no intervening writes is a no-op.
    pub fn commit(&mut self) {
        let changes = std::mem::take(&mut self.changes);
        for (key, value) in changes {
            self.snapshot.insert(key, value);
        }
        self.notify(DraftEvent::Committed);
    }

    /// Drop all pending edits. The snapshot is unchanged, so reads revert to the
    /// last confirmed values.
    pub fn discard(&mut self) {
        self.changes.clear();
        self.notify(DraftEvent::Discarded);
    }

    /// Replace the snapshot with an authoritative record (e.g. the body of a
    /// successful `PATCH` response) and clear all pending edits.
    pub fn replace<T: Serialize>(&mut self, record: &T) -> Result<(), CuratorError> {
        self.snapshot = to_object(record)?;
        self.changes.clear();
        self.notify(DraftEvent::Replaced);
        Ok(())
    }

    /// Deserialize the draft as the caller currently sees it: snapshot with pending
    /// changes overlaid.
    pub fn to_record<T: DeserializeOwned>(&self) -> Result<T, CuratorError> {
        let mut merged = self.snapshot.clone();
        for (key, value) in &self.changes {
            merged.insert(key.clone(), value.clone());
        }
        Ok(serde_json::from_value(Value::Object(merged))?)
    }

    /// Register an observer. Each mutation sends one [`Event::Draft`] on every
    /// subscribed channel, synchronously and without blocking.
    pub fn subscribe(&mut self, sender: UnboundedSender<Event>) {
        self.observers.push(sender);
    }

    fn notify(&mut self, event: DraftEvent) {
        self.observers.retain(|observer| {
            match observer.send(Event::Draft(event.clone())) {
                Ok(()) => true,
                Err(_) => {
                    // Receiver side is gone; unsubscribe it.
                    tracing::trace!("Dropping closed draft observer");
                    false
                }
            }
        });
    }
}

fn to_object<T: Serialize>(record: &T) -> Result<Map<String, Value>, CuratorError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(CuratorError::Serialization(format!(
            "Draft requires a fixed-shape record, got {other}"
        ))),
    }
}
