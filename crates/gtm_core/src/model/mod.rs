//! Canonical tracker document and entity records.
//!
//! # Responsibility
//! - Define the persisted JSON shape of the tracker document.
//! - Define create (draft) and partial-update (patch) inputs per collection.
//!
//! # Invariants
//! - Every collection record carries a stable `id` and an immutable
//!   `createdAt`; drafts and patches cannot reach either field.
//! - Daily rhythm records are keyed by calendar date, at most one per date.
//! - The persisted shape is unversioned; renaming a field breaks stored data.

pub mod application;
pub mod document;
pub mod ids;
pub mod records;
pub mod rhythm;

use chrono::{DateTime, Utc};

pub use ids::{new_entity_id, EntityId};

/// Wall-clock instant stored as RFC 3339 UTC text.
pub type Timestamp = DateTime<Utc>;

/// Shared contract for id-addressed collections inside [`document::Document`].
///
/// Lets the store implement add/update/delete once for all five mutable
/// collections.
pub trait Record: Clone {
    /// Caller-supplied fields for a new record.
    type Draft;
    /// Partial update; `None` leaves a field untouched.
    type Patch;

    /// Collection key in the persisted document, used in log events.
    const COLLECTION: &'static str;

    fn create(id: EntityId, now: Timestamp, draft: Self::Draft) -> Self;
    fn id(&self) -> &str;
    fn created_at(&self) -> Timestamp;
    fn apply(&mut self, patch: Self::Patch, now: Timestamp);

    fn items(doc: &document::Document) -> &[Self];
    fn items_mut(doc: &mut document::Document) -> &mut Vec<Self>;
}

/// Overwrites `slot` when the patch carries a value.
pub(crate) fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
