//! One-shot full-itinerary generation
//!
//! A new trip gets its whole schedule in a single provider call: the
//! inventory (nights of accommodation, three meals a day, leftover
//! activity slots) is computed from the date range and written into the
//! prompt verbatim, and the reply must be a bare JSON array of items.
//! On any failure the store is left untouched so trip creation can
//! still succeed with an empty itinerary.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{ItineraryItem, ItineraryStore};
use crate::llm::GenerationClient;
use crate::planner::PlannerError;
use crate::protocol::{parse_payload, validate_item_list, PromptComposer};

/// Hard cap on items in one generated itinerary
pub const MAX_BULK_ITEMS: u32 = 30;

/// What the traveler told us about the trip
#[derive(Debug, Clone)]
pub struct TripPlanRequest {
    pub destination: String,
    pub title: String,
    pub start_date: NaiveDate,
    /// Inclusive: a trip from the 1st to the 3rd spans three days
    pub end_date: NaiveDate,
    pub description: Option<String>,
}

/// Item counts the generated itinerary must hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItineraryInventory {
    pub days: u32,
    pub nights: u32,
    pub accommodations: u32,
    pub breakfasts: u32,
    pub lunches: u32,
    pub dinners: u32,
    pub total_items: u32,
    pub activity_slots: u32,
}

impl ItineraryInventory {
    /// Compute the inventory for a request's date range.
    ///
    /// One accommodation check-in per night, three meals per day, and
    /// whatever room is left under the cap becomes activity slots. On
    /// long trips the cap bites and the slots go to zero.
    pub fn from_request(request: &TripPlanRequest) -> Result<Self, PlannerError> {
        if request.end_date < request.start_date {
            return Err(PlannerError::EmptyDateRange {
                start: request.start_date,
                end: request.end_date,
            });
        }

        let days = (request.end_date - request.start_date).num_days() as u32 + 1;
        let nights = days - 1;
        let required = nights + days * 3;
        let total_items = (days * 4 + nights).min(MAX_BULK_ITEMS);

        Ok(Self {
            days,
            nights,
            accommodations: nights,
            breakfasts: days,
            lunches: days,
            dinners: days,
            total_items,
            activity_slots: total_items.saturating_sub(required),
        })
    }
}

pub struct BulkItineraryGenerator {
    client: Arc<dyn GenerationClient>,
    composer: PromptComposer,
    budget: Duration,
}

impl BulkItineraryGenerator {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        composer: PromptComposer,
        budget: Duration,
    ) -> Self {
        Self { client, composer, budget }
    }

    /// Generate a full itinerary and store it via `bulk_replace`.
    ///
    /// Returns the stored items. Errors leave the store untouched.
    pub async fn generate(
        &self,
        request: &TripPlanRequest,
        store: &dyn ItineraryStore,
    ) -> Result<Vec<ItineraryItem>, PlannerError> {
        let inventory = ItineraryInventory::from_request(request)?;
        info!(
            destination = %request.destination,
            days = inventory.days,
            total_items = inventory.total_items,
            "generating full itinerary"
        );

        let prompt = self
            .composer
            .compose_bulk(request, &inventory)
            .map_err(|e| PlannerError::Prompt(e.to_string()))?;

        let raw = self.client.generate(&prompt, self.budget).await?;
        let payload = parse_payload(&raw)?;
        let items = validate_item_list(&payload)?;

        if items.len() > MAX_BULK_ITEMS as usize {
            return Err(PlannerError::TooManyItems {
                count: items.len(),
                max: MAX_BULK_ITEMS,
            });
        }

        store.bulk_replace(items.clone())?;
        info!(count = items.len(), "generated itinerary stored");
        Ok(items)
    }
}
