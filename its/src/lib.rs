//! ItinStore - itinerary persistence for trip planning
//!
//! Each trip's itinerary is a list of [`ItineraryItem`] records, unique by
//! id within the trip and ordered by (date, time). The [`ItineraryStore`]
//! trait is the seam the planner mutates through; a handle is always bound
//! to a single trip.
//!
//! # Architecture
//!
//! ```text
//! itinerary.db
//! ├── trips   # id, name, destination, title, start_date, end_date, created_at
//! └── items   # (trip_id, id) -> date, time, payload (item JSON)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use itinstore::{ItineraryStore, NewTrip, SqliteDb};
//!
//! let db = SqliteDb::open("itinerary.db")?;
//! let trip = db.create_trip(NewTrip { destination: "Paris".into(), .. })?;
//! let store = db.trip(&trip.id)?;
//! store.insert(item)?;
//! let itinerary = store.current()?;
//! ```
//!
//! [`MemoryStore`] backs tests and ephemeral sessions with the same trait.

mod item;
mod sqlite;
mod store;

pub use item::{
    sort_items, Coordinates, DurationHours, DurationParseError, ItemKind, ItineraryItem,
};
pub use sqlite::{NewTrip, SqliteDb, SqliteStore, Trip};
pub use store::{ItineraryStore, MemoryStore, RemoveOutcome, StoreError};
