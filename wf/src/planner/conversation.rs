//! The conversational turn
//!
//! `ItineraryPlanner` drives one message through the pipeline: compose,
//! generate, parse, validate, detect conflicts. It never touches the
//! store; the caller decides whether and when to apply the envelope, so
//! a conflict warning can reach the traveler before anything changes.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::{ConversationTurn, ItineraryItem, ResponseEnvelope, TripPreferences};
use crate::llm::GenerationClient;
use crate::planner::PlannerError;
use crate::protocol::{find_conflicts, parse_payload, validate_envelope, PromptComposer};

/// One validated assistant turn, ready for display and application
#[derive(Debug)]
pub struct TurnReply {
    pub envelope: ResponseEnvelope,
    /// Existing items overlapping a proposed create/update, in schedule
    /// order. Empty for text-only, delete, and bulk replies.
    pub conflicts: Vec<ItineraryItem>,
}

pub struct ItineraryPlanner {
    client: Arc<dyn GenerationClient>,
    composer: PromptComposer,
    chat_budget: Duration,
}

impl ItineraryPlanner {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        composer: PromptComposer,
        chat_budget: Duration,
    ) -> Self {
        Self { client, composer, chat_budget }
    }

    /// Run one conversational turn against the given itinerary snapshot.
    ///
    /// Conflicts are detected against the same snapshot the prompt was
    /// composed from, never a re-fetched one, so the traveler's warning
    /// matches what the model saw.
    pub async fn converse(
        &self,
        message: &str,
        itinerary: &[ItineraryItem],
        history: &[ConversationTurn],
        preferences: &TripPreferences,
    ) -> Result<TurnReply, PlannerError> {
        let prompt = self
            .composer
            .compose_chat(message, itinerary, history, preferences)
            .map_err(|e| PlannerError::Prompt(e.to_string()))?;

        let raw = self.client.generate(&prompt, self.chat_budget).await?;
        debug!(chars = raw.len(), "provider reply received");

        let payload = parse_payload(&raw)?;
        let envelope = validate_envelope(&payload)?;

        let conflicts: Vec<ItineraryItem> = envelope
            .proposed_item()
            .map(|item| find_conflicts(item, itinerary).into_iter().cloned().collect())
            .unwrap_or_default();

        info!(
            action = ?envelope.action,
            bulk = envelope.itinerary_update.is_some(),
            conflicts = conflicts.len(),
            "turn validated"
        );
        Ok(TurnReply { envelope, conflicts })
    }

    /// Like [`converse`], but degrades every failure into the generic
    /// fallback reply. One bad model turn must not end the session.
    ///
    /// [`converse`]: ItineraryPlanner::converse
    pub async fn converse_or_fallback(
        &self,
        message: &str,
        itinerary: &[ItineraryItem],
        history: &[ConversationTurn],
        preferences: &TripPreferences,
    ) -> TurnReply {
        match self.converse(message, itinerary, history, preferences).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "turn failed, replying with the fallback");
                TurnReply { envelope: ResponseEnvelope::fallback(), conflicts: Vec::new() }
            }
        }
    }
}
