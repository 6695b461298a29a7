//! End-to-end tests for one-shot itinerary generation
//!
//! These run the bulk generator against a real SQLite trip database, with
//! the provider replaced by a scripted client.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use itinstore::{
    Coordinates, DurationHours, ItemKind, ItineraryItem, ItineraryStore, NewTrip, SqliteDb,
    SqliteStore, Trip,
};
use tempfile::TempDir;
use wayfarer::{
    BulkItineraryGenerator, GenerationClient, PlannerError, PromptComposer, ProviderError,
    TripPlanRequest,
};

struct ScriptedClient {
    replies: Vec<String>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    fn new(replies: Vec<String>) -> Self {
        Self { replies, calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(&self, _prompt: &str, _budget: Duration) -> Result<String, ProviderError> {
        let idx = self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies.get(idx).cloned().ok_or_else(|| ProviderError::Unavailable {
            message: "script exhausted".to_string(),
        })
    }
}

fn generator(replies: Vec<String>) -> BulkItineraryGenerator {
    BulkItineraryGenerator::new(
        Arc::new(ScriptedClient::new(replies)),
        PromptComposer::embedded(),
        Duration::from_secs(90),
    )
}

fn paris_request() -> TripPlanRequest {
    TripPlanRequest {
        destination: "Paris, France".to_string(),
        title: "Long weekend in Paris".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        description: None,
    }
}

fn paris_trip(db: &SqliteDb) -> (Trip, SqliteStore) {
    let trip = db
        .create_trip(NewTrip {
            destination: "Paris, France".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            name: None,
            title: None,
        })
        .expect("create trip");
    let store = db.trip(&trip.id).expect("bind store");
    (trip, store)
}

fn item(id: i64, day: u32, time: &str, hours: f64, location: &str, kind: ItemKind) -> ItineraryItem {
    ItineraryItem {
        id,
        date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
        time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        duration: DurationHours::new(hours).unwrap(),
        location: location.to_string(),
        address: format!("{location}, Paris"),
        activity: format!("Visit {location}"),
        kind,
        rating: 4.4,
        coordinates: Coordinates { lat: 48.8566, lng: 2.3522 },
    }
}

/// The full inventory for a 3-day, 2-night Paris trip: 2 check-ins,
/// 9 meals, 3 activities, 14 items in all
fn paris_items() -> Vec<ItineraryItem> {
    let mut items = Vec::new();
    let mut id = 0;
    let mut next = |day, time, hours, location: &str, kind| {
        id += 1;
        item(id, day, time, hours, location, kind)
    };

    for day in 1..=3 {
        items.push(next(day, "08:00", 1.0, "Cafe de Flore", ItemKind::Restaurant));
        items.push(next(day, "12:30", 1.5, "Le Comptoir", ItemKind::Restaurant));
        items.push(next(day, "19:00", 2.0, "Bistrot Paul Bert", ItemKind::Restaurant));
    }
    for day in 1..=2 {
        items.push(next(day, "15:00", 0.5, "Hotel des Grands Boulevards", ItemKind::Accommodation));
    }
    items.push(next(1, "10:00", 2.5, "Louvre", ItemKind::Museum));
    items.push(next(2, "10:00", 2.0, "Eiffel Tower", ItemKind::Landmark));
    items.push(next(3, "10:00", 2.0, "Jardin du Luxembourg", ItemKind::Outdoor));
    items
}

// =============================================================================
// Generation
// =============================================================================

#[tokio::test]
async fn test_generated_items_land_in_sqlite() {
    let dir = TempDir::new().expect("temp dir");
    let db = SqliteDb::open(dir.path().join("itinerary.db")).expect("open db");
    let (trip, store) = paris_trip(&db);

    // Providers often fence the array; the pipeline must see through it
    let reply = format!("```json\n{}\n```", serde_json::to_string(&paris_items()).unwrap());
    let generator = generator(vec![reply]);

    let items = generator.generate(&paris_request(), &store).await.expect("generate");
    assert_eq!(items.len(), 14);
    assert_eq!(db.item_count(&trip.id).expect("count"), 14);

    // The store hands the itinerary back ordered by (date, time)
    let stored = store.current().expect("current");
    assert_eq!(stored.len(), 14);
    assert_eq!(stored[0].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    assert_eq!(stored[0].location, "Cafe de Flore");
    let last = stored.last().unwrap();
    assert_eq!(last.date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    assert_eq!(last.location, "Bistrot Paul Bert");
}

#[tokio::test]
async fn test_failed_generation_leaves_the_trip_empty() {
    let dir = TempDir::new().expect("temp dir");
    let db = SqliteDb::open(dir.path().join("itinerary.db")).expect("open db");
    let (trip, store) = paris_trip(&db);

    let generator = generator(vec!["Here are some ideas for your trip!".to_string()]);

    let result = generator.generate(&paris_request(), &store).await;
    assert!(matches!(result, Err(PlannerError::Parse(_))));
    assert_eq!(db.item_count(&trip.id).expect("count"), 0, "trip starts empty after a failure");
}

#[tokio::test]
async fn test_regeneration_replaces_the_previous_itinerary() {
    let dir = TempDir::new().expect("temp dir");
    let db = SqliteDb::open(dir.path().join("itinerary.db")).expect("open db");
    let (_, store) = paris_trip(&db);

    // A hand-entered leftover from before the regeneration
    store
        .insert(item(99, 2, "23:00", 1.0, "Old Plan", ItemKind::Activity))
        .expect("seed item");

    let reply = serde_json::to_string(&paris_items()).unwrap();
    let generator = generator(vec![reply]);

    generator.generate(&paris_request(), &store).await.expect("generate");

    let stored = store.current().expect("current");
    assert_eq!(stored.len(), 14);
    assert!(stored.iter().all(|i| i.id != 99), "the old item must be gone");
}

#[tokio::test]
async fn test_oversized_reply_is_rejected_before_the_store() {
    let dir = TempDir::new().expect("temp dir");
    let db = SqliteDb::open(dir.path().join("itinerary.db")).expect("open db");
    let (trip, store) = paris_trip(&db);

    // 31 parallel-universe breakfasts, one over the cap
    let too_many: Vec<ItineraryItem> = (1..=31)
        .map(|id| item(id, 1, "08:00", 1.0, "Cafe de Flore", ItemKind::Restaurant))
        .collect();
    let generator = generator(vec![serde_json::to_string(&too_many).unwrap()]);

    let result = generator.generate(&paris_request(), &store).await;
    assert!(matches!(result, Err(PlannerError::TooManyItems { count: 31, max: 30 })));
    assert_eq!(db.item_count(&trip.id).expect("count"), 0);
}
