//! Domain types for Wayfarer
//!
//! Core protocol types: ResponseEnvelope (one assistant turn on the wire),
//! ConversationTurn (grounding history), TripPreferences.
//! The itinerary record types live in the itinstore crate.

mod envelope;
mod preferences;
mod turn;

pub use envelope::{
    ActionData, ItemRef, ItineraryAction, ResponseEnvelope, FALLBACK_TEXT,
};
pub use preferences::TripPreferences;
pub use turn::{recent_turns, ConversationTurn, Role, HISTORY_WINDOW};

// Re-export itinstore types for convenience
pub use itinstore::{
    sort_items, Coordinates, DurationHours, ItemKind, ItineraryItem, ItineraryStore,
    RemoveOutcome, StoreError,
};
