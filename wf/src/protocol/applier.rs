//! Apply a validated envelope to the itinerary store
//!
//! One envelope maps to at most one store mutation: a single-item action
//! becomes an insert, replace, or remove, and a bulk `itineraryUpdate`
//! becomes one wholesale replacement. A text-only envelope touches
//! nothing. Keeping the mapping this narrow means a turn can never leave
//! the store half-changed.

use std::fmt;

use thiserror::Error;
use tracing::info;

use crate::domain::{
    ActionData, ItineraryAction, ItineraryStore, RemoveOutcome, ResponseEnvelope, StoreError,
};

/// Applying an envelope to the store failed
#[derive(Debug, Error)]
pub enum ApplyError {
    /// The action targeted an id that is not in the itinerary
    #[error("no itinerary item with id {0}")]
    ItemNotFound(i64),
    /// The envelope shape does not support its own action, e.g. a
    /// create with only an id ref. Validated payloads never hit this.
    #[error("envelope cannot be applied: {detail}")]
    InvalidEnvelope { detail: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a handled envelope did to the itinerary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Created(i64),
    Updated(i64),
    Deleted(i64),
    /// A delete aimed at an id that was already gone. Not an error: the
    /// traveler got what they asked for.
    DeleteNoOp(i64),
    Replaced { count: usize },
    TextOnly,
}

impl fmt::Display for MutationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationOutcome::Created(id) => write!(f, "added item {id}"),
            MutationOutcome::Updated(id) => write!(f, "updated item {id}"),
            MutationOutcome::Deleted(id) => write!(f, "removed item {id}"),
            MutationOutcome::DeleteNoOp(id) => write!(f, "item {id} was already gone"),
            MutationOutcome::Replaced { count } => {
                write!(f, "replaced the itinerary with {count} items")
            }
            MutationOutcome::TextOnly => write!(f, "no itinerary change"),
        }
    }
}

/// Apply one envelope to the store
pub fn apply(
    envelope: &ResponseEnvelope,
    store: &dyn ItineraryStore,
) -> Result<MutationOutcome, ApplyError> {
    if let Some(items) = &envelope.itinerary_update {
        let count = items.len();
        info!(count, "applying bulk itinerary replacement");
        store.bulk_replace(items.clone())?;
        return Ok(MutationOutcome::Replaced { count });
    }

    let (Some(action), Some(data)) = (envelope.action, &envelope.action_data) else {
        return Ok(MutationOutcome::TextOnly);
    };

    match action {
        ItineraryAction::CreateItem => {
            let item = full_item(action, data)?;
            info!(id = item.id, location = %item.location, "applying create_item");
            store.insert(item.clone())?;
            Ok(MutationOutcome::Created(item.id))
        }
        ItineraryAction::UpdateItem => {
            let item = full_item(action, data)?;
            info!(id = item.id, location = %item.location, "applying update_item");
            store.replace(item.clone()).map_err(not_found_or_store)?;
            Ok(MutationOutcome::Updated(item.id))
        }
        ItineraryAction::DeleteItem => {
            let id = data.item_id();
            info!(id, "applying delete_item");
            match store.remove(id)? {
                RemoveOutcome::Removed => Ok(MutationOutcome::Deleted(id)),
                RemoveOutcome::NotPresent => Ok(MutationOutcome::DeleteNoOp(id)),
            }
        }
    }
}

fn full_item<'a>(
    action: ItineraryAction,
    data: &'a ActionData,
) -> Result<&'a crate::domain::ItineraryItem, ApplyError> {
    data.as_item().ok_or_else(|| ApplyError::InvalidEnvelope {
        detail: format!("{action} requires a full item in actionData"),
    })
}

fn not_found_or_store(err: StoreError) -> ApplyError {
    match err {
        StoreError::ItemNotFound(id) => ApplyError::ItemNotFound(id),
        other => ApplyError::Store(other),
    }
}
