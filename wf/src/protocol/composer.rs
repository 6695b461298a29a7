//! Prompt composition
//!
//! Builds the chat-turn and bulk-plan prompts from template plus context.
//! The itinerary snapshot goes in as pretty-printed JSON labeled the sole
//! source of truth, which is what keeps the model from inventing items;
//! history is clipped to the last [`HISTORY_WINDOW`] turns so prompts do
//! not grow without bound over a long session.
//!
//! [`HISTORY_WINDOW`]: crate::domain::HISTORY_WINDOW

use chrono::Local;
use eyre::Result;
use serde::Serialize;
use tracing::debug;

use crate::domain::{recent_turns, ConversationTurn, ItineraryItem, TripPreferences};
use crate::planner::{ItineraryInventory, TripPlanRequest};
use crate::prompts::PromptLoader;

pub struct PromptComposer {
    loader: PromptLoader,
}

#[derive(Debug, Serialize)]
struct ChatPromptContext {
    today: String,
    itinerary_json: String,
    history: String,
    has_history: bool,
    preferences: String,
    has_preferences: bool,
    message: String,
}

#[derive(Debug, Serialize)]
struct BulkPromptContext {
    title: String,
    destination: String,
    start_date: String,
    end_date: String,
    days: u32,
    nights: u32,
    description: String,
    has_description: bool,
    total_items: u32,
    accommodations: u32,
    breakfasts: u32,
    lunches: u32,
    dinners: u32,
    activity_slots: u32,
}

impl PromptComposer {
    pub fn new(loader: PromptLoader) -> Self {
        Self { loader }
    }

    /// Composer with embedded templates only, no filesystem overrides
    pub fn embedded() -> Self {
        Self { loader: PromptLoader::embedded_only() }
    }

    /// Build the prompt for one conversational turn
    pub fn compose_chat(
        &self,
        message: &str,
        itinerary: &[ItineraryItem],
        history: &[ConversationTurn],
        preferences: &TripPreferences,
    ) -> Result<String> {
        let window = recent_turns(history);
        let history_lines = window
            .iter()
            .map(|turn| format!("{}: {}", turn.role.as_str(), turn.text))
            .collect::<Vec<_>>()
            .join("\n");

        let context = ChatPromptContext {
            today: Local::now().date_naive().to_string(),
            itinerary_json: serde_json::to_string_pretty(itinerary)?,
            has_history: !window.is_empty(),
            history: history_lines,
            has_preferences: !preferences.is_empty(),
            preferences: preferences.prompt_lines().join("\n"),
            message: message.to_string(),
        };

        debug!(
            items = itinerary.len(),
            turns = window.len(),
            "composing chat prompt"
        );
        self.loader.render("chat-turn", &context)
    }

    /// Build the one-shot prompt for bulk itinerary generation
    pub fn compose_bulk(
        &self,
        request: &TripPlanRequest,
        inventory: &ItineraryInventory,
    ) -> Result<String> {
        let description = request.description.as_deref().unwrap_or("").trim();

        let context = BulkPromptContext {
            title: request.title.clone(),
            destination: request.destination.clone(),
            start_date: request.start_date.to_string(),
            end_date: request.end_date.to_string(),
            days: inventory.days,
            nights: inventory.nights,
            has_description: !description.is_empty(),
            description: description.to_string(),
            total_items: inventory.total_items,
            accommodations: inventory.accommodations,
            breakfasts: inventory.breakfasts,
            lunches: inventory.lunches,
            dinners: inventory.dinners,
            activity_slots: inventory.activity_slots,
        };

        debug!(
            destination = %request.destination,
            total_items = inventory.total_items,
            "composing bulk plan prompt"
        );
        self.loader.render("bulk-plan", &context)
    }
}
