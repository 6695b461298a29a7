//! SQLite-backed trip database
//!
//! One database file holds every trip. Trip rows carry the trip metadata;
//! itinerary items live in a second table as a JSON payload plus indexed
//! `date` and `time` columns so the canonical ordering is a plain ORDER BY.
//!
//! [`SqliteDb`] manages trips; [`SqliteDb::trip`] binds a [`SqliteStore`]
//! handle to one trip, and that handle is what implements
//! [`ItineraryStore`].

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::item::{sort_items, ItineraryItem};
use crate::store::{duplicate_id, ItineraryStore, RemoveOutcome, StoreError};

const SCHEMA: &str = "BEGIN;
CREATE TABLE IF NOT EXISTS trips (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    destination TEXT NOT NULL,
    title       TEXT NOT NULL,
    start_date  TEXT NOT NULL,
    end_date    TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS items (
    trip_id TEXT NOT NULL REFERENCES trips(id),
    id      INTEGER NOT NULL,
    date    TEXT NOT NULL,
    time    TEXT NOT NULL,
    payload TEXT NOT NULL,
    PRIMARY KEY (trip_id, id)
);
CREATE INDEX IF NOT EXISTS idx_items_schedule ON items(trip_id, date, time);
COMMIT;";

/// A stored trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Format: `{6-char-hex}-trip-{slug}`, e.g. `019430-trip-paris`
    pub id: String,
    /// Unique handle used on the command line
    pub name: String,
    pub destination: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a trip; name and title are derived from the
/// destination when not given.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub name: Option<String>,
    pub title: Option<String>,
}

/// Handle on the trip database
#[derive(Debug, Clone)]
pub struct SqliteDb {
    conn: Arc<Mutex<Connection>>,
    #[allow(dead_code)]
    db_path: PathBuf,
}

impl SqliteDb {
    /// Open (creating if needed) the database at `path`. The parent
    /// directory must already exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = path.as_ref().to_path_buf();
        let conn = Connection::open(&db_path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        info!(path = %db_path.display(), "opened trip database");
        Ok(Self { conn: Arc::new(Mutex::new(conn)), db_path })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a trip, failing with [`StoreError::DuplicateTrip`] if the
    /// name is taken.
    pub fn create_trip(&self, new: NewTrip) -> Result<Trip, StoreError> {
        let slug = slugify(&new.destination);
        let name = new.name.unwrap_or_else(|| slug.clone());
        let title = new.title.unwrap_or_else(|| format!("Trip to {}", new.destination));
        let trip = Trip {
            id: trip_id(&slug),
            name,
            destination: new.destination,
            title,
            start_date: new.start_date,
            end_date: new.end_date,
            created_at: Utc::now(),
        };

        let conn = self.lock();
        conn.execute(
            "INSERT INTO trips (id, name, destination, title, start_date, end_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                trip.id,
                trip.name,
                trip.destination,
                trip.title,
                trip.start_date.to_string(),
                trip.end_date.to_string(),
                trip.created_at.to_rfc3339(),
            ],
        )
        .map_err(|err| {
            if is_constraint_violation(&err) {
                StoreError::DuplicateTrip(trip.name.clone())
            } else {
                err.into()
            }
        })?;

        info!(trip_id = %trip.id, name = %trip.name, "created trip");
        Ok(trip)
    }

    /// Look up a trip by its name, falling back to an exact id match
    pub fn find_trip(&self, name_or_id: &str) -> Result<Option<Trip>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, destination, title, start_date, end_date, created_at
             FROM trips WHERE name = ?1 OR id = ?1",
        )?;
        let raw = stmt
            .query_row(params![name_or_id], RawTrip::from_row)
            .optional()?;
        raw.map(RawTrip::into_trip).transpose()
    }

    /// All trips, newest first
    pub fn list_trips(&self) -> Result<Vec<Trip>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, destination, title, start_date, end_date, created_at
             FROM trips ORDER BY created_at DESC, id",
        )?;
        let raws = stmt
            .query_map([], RawTrip::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        raws.into_iter().map(RawTrip::into_trip).collect()
    }

    /// Number of itinerary items in a trip
    pub fn item_count(&self, trip_id: &str) -> Result<i64, StoreError> {
        let conn = self.lock();
        let count =
            conn.query_row("SELECT COUNT(1) FROM items WHERE trip_id = ?1", params![trip_id], |row| {
                row.get(0)
            })?;
        Ok(count)
    }

    /// Bind an [`ItineraryStore`] handle to one trip
    pub fn trip(&self, trip_id: &str) -> Result<SqliteStore, StoreError> {
        let exists = {
            let conn = self.lock();
            let mut stmt = conn.prepare("SELECT 1 FROM trips WHERE id = ?1 LIMIT 1")?;
            stmt.exists(params![trip_id])?
        };
        if !exists {
            return Err(StoreError::TripNotFound(trip_id.to_string()));
        }
        Ok(SqliteStore { conn: Arc::clone(&self.conn), trip_id: trip_id.to_string() })
    }
}

/// [`ItineraryStore`] over one trip's rows in the shared database
#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    trip_id: String,
}

impl SqliteStore {
    pub fn trip_id(&self) -> &str {
        &self.trip_id
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ItineraryStore for SqliteStore {
    fn current(&self) -> Result<Vec<ItineraryItem>, StoreError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT payload FROM items WHERE trip_id = ?1 ORDER BY date, time, id",
        )?;
        let payloads = stmt
            .query_map(params![self.trip_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        payloads.iter().map(|payload| parse_payload(payload)).collect()
    }

    fn insert(&self, item: ItineraryItem) -> Result<(), StoreError> {
        let payload = encode_payload(&item)?;
        let conn = self.lock();
        debug!(trip_id = %self.trip_id, id = item.id, location = %item.location, "inserting itinerary item");
        conn.execute(
            "INSERT INTO items (trip_id, id, date, time, payload) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                self.trip_id,
                item.id,
                item.date.to_string(),
                item.time.format("%H:%M").to_string(),
                payload,
            ],
        )
        .map_err(|err| {
            if is_constraint_violation(&err) {
                StoreError::DuplicateId(item.id)
            } else {
                err.into()
            }
        })?;
        Ok(())
    }

    fn replace(&self, item: ItineraryItem) -> Result<(), StoreError> {
        let payload = encode_payload(&item)?;
        let conn = self.lock();
        debug!(trip_id = %self.trip_id, id = item.id, "replacing itinerary item");
        let changed = conn.execute(
            "UPDATE items SET date = ?3, time = ?4, payload = ?5
             WHERE trip_id = ?1 AND id = ?2",
            params![
                self.trip_id,
                item.id,
                item.date.to_string(),
                item.time.format("%H:%M").to_string(),
                payload,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::ItemNotFound(item.id));
        }
        Ok(())
    }

    fn remove(&self, id: i64) -> Result<RemoveOutcome, StoreError> {
        let conn = self.lock();
        let removed = conn.execute(
            "DELETE FROM items WHERE trip_id = ?1 AND id = ?2",
            params![self.trip_id, id],
        )?;
        if removed == 0 {
            debug!(trip_id = %self.trip_id, id, "remove of absent itinerary item");
            Ok(RemoveOutcome::NotPresent)
        } else {
            debug!(trip_id = %self.trip_id, id, "removed itinerary item");
            Ok(RemoveOutcome::Removed)
        }
    }

    fn bulk_replace(&self, mut items: Vec<ItineraryItem>) -> Result<(), StoreError> {
        if let Some(id) = duplicate_id(&items) {
            return Err(StoreError::DuplicateId(id));
        }
        sort_items(&mut items);
        let encoded = items
            .iter()
            .map(|item| Ok((item, encode_payload(item)?)))
            .collect::<Result<Vec<_>, StoreError>>()?;

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM items WHERE trip_id = ?1", params![self.trip_id])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO items (trip_id, id, date, time, payload) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (item, payload) in &encoded {
                stmt.execute(params![
                    self.trip_id,
                    item.id,
                    item.date.to_string(),
                    item.time.format("%H:%M").to_string(),
                    payload,
                ])?;
            }
        }
        tx.commit()?;
        debug!(trip_id = %self.trip_id, count = items.len(), "replaced full itinerary");
        Ok(())
    }
}

fn encode_payload(item: &ItineraryItem) -> Result<String, StoreError> {
    serde_json::to_string(item)
        .map_err(|err| StoreError::Corrupt { detail: format!("unserializable item: {err}") })
}

fn parse_payload(payload: &str) -> Result<ItineraryItem, StoreError> {
    serde_json::from_str(payload)
        .map_err(|err| StoreError::Corrupt { detail: format!("bad item payload: {err}") })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Trip IDs follow the format `{6-char-hex}-trip-{slug}`
fn trip_id(slug: &str) -> String {
    let uuid = uuid::Uuid::now_v7();
    let hex_prefix = &uuid.to_string()[..6];
    format!("{hex_prefix}-trip-{slug}")
}

/// Slugify a destination for use in trip ids and default names
fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Trip row as stored, before date parsing
struct RawTrip {
    id: String,
    name: String,
    destination: String,
    title: String,
    start_date: String,
    end_date: String,
    created_at: String,
}

impl RawTrip {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            destination: row.get(2)?,
            title: row.get(3)?,
            start_date: row.get(4)?,
            end_date: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_trip(self) -> Result<Trip, StoreError> {
        let corrupt = |what: &str, value: &str| StoreError::Corrupt {
            detail: format!("trip {}: bad {what} {value:?}", self.id),
        };
        Ok(Trip {
            start_date: self
                .start_date
                .parse()
                .map_err(|_| corrupt("start_date", &self.start_date))?,
            end_date: self.end_date.parse().map_err(|_| corrupt("end_date", &self.end_date))?,
            created_at: DateTime::parse_from_rfc3339(&self.created_at)
                .map_err(|_| corrupt("created_at", &self.created_at))?
                .with_timezone(&Utc),
            id: self.id,
            name: self.name,
            destination: self.destination,
            title: self.title,
        })
    }
}
