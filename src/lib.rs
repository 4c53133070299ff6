//! # curator-core
//!
//! The data layer of the Curator archive admin console.
//!
//! The console renders the categories of an archived-content collection (posts,
//! authors, collections, platforms, tags, file attachments) and lets an operator
//! edit and delete them through a REST API. This crate implements the two
//! mechanisms every view needs but none should reimplement:
//!
//! - **[`draft`]**: change tracking. A [`draft::Draft`] wraps a snapshot record,
//!   overlays pending edits on reads, and collects edits into a sparse change set
//!   that can be committed, discarded, or replaced without corrupting the snapshot.
//!   The change set doubles as the minimal `PATCH` body to send to the server.
//! - **[`relations`]**: relation resolution and caching. Entities arrive from the
//!   API denormalized with their related entities attached; a
//!   [`relations::RelationCache`] indexes them by identifier in one table set
//!   shared across the whole session, and derives lookups such as attachment paths
//!   and thumbnails from the merged tables.
//!
//! The two components are orthogonal: drafts never touch relation data, and the
//! cache never tracks edits. The REST transport itself (fetch calls, status
//! handling, toasts) lives outside this crate; it supplies raw records and relation
//! bundles, and reads back committed records and change sets.
//!
//! ## Quick Start
//!
//! ```rust
//! use curator_core::draft::Draft;
//! use curator_core::entity::{Author, AuthorId};
//! use curator_core::relations::{RelationBundle, RelationCache};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let author = Author {
//!         id: AuthorId(1),
//!         name: "ada".to_string(),
//!         ..Default::default()
//!     };
//!
//!     // Edit through a draft; the snapshot stays pristine until commit.
//!     let mut draft = Draft::wrap(&author)?;
//!     draft.set("name", "lovelace")?;
//!     assert_eq!(draft.get("name")?, "lovelace");
//!     assert!(draft.has_changes());
//!     draft.commit();
//!     assert!(!draft.has_changes());
//!
//!     // Merge the relations that accompanied a fetch into the shared cache.
//!     let cache = RelationCache::new();
//!     cache.merge(&RelationBundle {
//!         authors: vec![author],
//!         ..Default::default()
//!     });
//!     assert_eq!(cache.tables().authors.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Sharing model
//!
//! A [`relations::RelationCache`] handle is cheap to clone and every clone points
//! at the same tables. This is deliberate: views display overlapping entities and
//! must agree on their state. It also means `merge` and `clear` are global side
//! effects; the sharing is kept explicit by passing the handle into every component
//! that resolves relations, rather than hiding it in a global.
//!
//! A [`draft::Draft`] is the opposite: exclusively owned by the view editing the
//! record, with no background references retained.
//!
//! ## Module Guide
//!
//! Start with [`draft::Draft`] for editing and [`relations::RelationCache`] for
//! lookups. [`entity`] defines the closed set of entity kinds and their records;
//! [`event`] carries the mutation notifications both components emit; [`config`]
//! holds the session settings the transport caller reads.

pub mod config;
pub mod draft;
pub mod entity;
pub mod error;
pub mod event;
pub mod relations;
#[cfg(test)]
mod tests;

pub use error::*;
