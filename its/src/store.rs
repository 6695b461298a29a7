//! Store trait and the in-memory backend

use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::item::{sort_items, ItineraryItem};

/// Errors from store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no itinerary item with id {0}")]
    ItemNotFound(i64),

    #[error("itinerary item id {0} already exists")]
    DuplicateId(i64),

    #[error("trip {0:?} not found")]
    TripNotFound(String),

    #[error("trip {0:?} already exists")]
    DuplicateTrip(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt store record: {detail}")]
    Corrupt { detail: String },
}

/// What a remove accomplished. Removing an id that is not present is not an
/// error; callers that care can branch on the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotPresent,
}

/// Persistence seam for one trip's itinerary.
///
/// A handle is bound to a single trip. Items are unique by id; `current`
/// always returns them in (date, time) order. Operations are synchronous;
/// callers on async paths should keep store calls short (they are).
pub trait ItineraryStore: Send + Sync {
    /// The full itinerary, ordered by (date, time)
    fn current(&self) -> Result<Vec<ItineraryItem>, StoreError>;

    /// Add a new item. Fails with [`StoreError::DuplicateId`] if the id is taken.
    fn insert(&self, item: ItineraryItem) -> Result<(), StoreError>;

    /// Overwrite the item with the same id. Fails with
    /// [`StoreError::ItemNotFound`] if no such item exists.
    fn replace(&self, item: ItineraryItem) -> Result<(), StoreError>;

    /// Remove the item with this id, reporting whether it was present.
    fn remove(&self, id: i64) -> Result<RemoveOutcome, StoreError>;

    /// Discard the whole itinerary and install `items` in its place.
    fn bulk_replace(&self, items: Vec<ItineraryItem>) -> Result<(), StoreError>;
}

/// In-memory itinerary store for tests and ephemeral sessions.
///
/// Mutex-guarded so a handle can be shared across threads; a poisoned lock
/// is recovered rather than propagated.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<Vec<ItineraryItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `items`
    pub fn seeded(mut items: Vec<ItineraryItem>) -> Self {
        sort_items(&mut items);
        Self { items: Mutex::new(items) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ItineraryItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ItineraryStore for MemoryStore {
    fn current(&self) -> Result<Vec<ItineraryItem>, StoreError> {
        Ok(self.lock().clone())
    }

    fn insert(&self, item: ItineraryItem) -> Result<(), StoreError> {
        let mut items = self.lock();
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(StoreError::DuplicateId(item.id));
        }
        debug!(id = item.id, location = %item.location, "inserting itinerary item");
        items.push(item);
        sort_items(&mut items);
        Ok(())
    }

    fn replace(&self, item: ItineraryItem) -> Result<(), StoreError> {
        let mut items = self.lock();
        let Some(slot) = items.iter_mut().find(|existing| existing.id == item.id) else {
            return Err(StoreError::ItemNotFound(item.id));
        };
        debug!(id = item.id, "replacing itinerary item");
        *slot = item;
        sort_items(&mut items);
        Ok(())
    }

    fn remove(&self, id: i64) -> Result<RemoveOutcome, StoreError> {
        let mut items = self.lock();
        let before = items.len();
        items.retain(|existing| existing.id != id);
        if items.len() < before {
            debug!(id, "removed itinerary item");
            Ok(RemoveOutcome::Removed)
        } else {
            debug!(id, "remove of absent itinerary item");
            Ok(RemoveOutcome::NotPresent)
        }
    }

    fn bulk_replace(&self, mut new_items: Vec<ItineraryItem>) -> Result<(), StoreError> {
        if let Some(id) = duplicate_id(&new_items) {
            return Err(StoreError::DuplicateId(id));
        }
        sort_items(&mut new_items);
        debug!(count = new_items.len(), "replacing full itinerary");
        *self.lock() = new_items;
        Ok(())
    }
}

/// First id that appears more than once, if any
pub(crate) fn duplicate_id(items: &[ItineraryItem]) -> Option<i64> {
    let mut seen = std::collections::HashSet::new();
    items.iter().find(|item| !seen.insert(item.id)).map(|item| item.id)
}
