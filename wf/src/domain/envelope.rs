//! Protocol reply envelope
//!
//! Every assistant turn is one JSON object: conversational text plus at most
//! one itinerary mutation, either a single-item action or a bulk update.
//! Field names on the wire are `text`, `action`, `actionData`,
//! `itineraryUpdate`.

use itinstore::ItineraryItem;
use serde::{Deserialize, Serialize};

/// Reply shown when a turn cannot be completed. The conversation continues;
/// nothing is mutated.
pub const FALLBACK_TEXT: &str =
    "Sorry, I couldn't work out that change to your itinerary. Could you rephrase your request?";

/// The single-item mutation verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItineraryAction {
    CreateItem,
    UpdateItem,
    DeleteItem,
}

impl ItineraryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItineraryAction::CreateItem => "create_item",
            ItineraryAction::UpdateItem => "update_item",
            ItineraryAction::DeleteItem => "delete_item",
        }
    }
}

impl std::fmt::Display for ItineraryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload accompanying an action: a full item for create/update, or a bare
/// id reference for delete. Untagged, with the full item tried first so a
/// complete object never degrades to a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionData {
    Item(ItineraryItem),
    Ref(ItemRef),
}

impl ActionData {
    /// The item id this payload refers to
    pub fn item_id(&self) -> i64 {
        match self {
            ActionData::Item(item) => item.id,
            ActionData::Ref(r) => r.id,
        }
    }

    /// The full item, when this payload carries one
    pub fn as_item(&self) -> Option<&ItineraryItem> {
        match self {
            ActionData::Item(item) => Some(item),
            ActionData::Ref(_) => None,
        }
    }
}

/// Bare item reference, `{ "id": 3 }` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: i64,
}

/// One assistant turn.
///
/// `action`/`action_data` are jointly null or jointly populated, and at most
/// one of {action, itinerary_update} is populated. The validator enforces
/// this before an envelope is ever constructed from provider output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    /// Conversational reply, always present and non-empty
    pub text: String,

    #[serde(default)]
    pub action: Option<ItineraryAction>,

    #[serde(default)]
    pub action_data: Option<ActionData>,

    /// Full-itinerary replacement, exclusive with `action`
    #[serde(default)]
    pub itinerary_update: Option<Vec<ItineraryItem>>,
}

impl ResponseEnvelope {
    /// A reply that mutates nothing
    pub fn text_only(text: impl Into<String>) -> Self {
        Self { text: text.into(), action: None, action_data: None, itinerary_update: None }
    }

    /// The generic reply used when a turn fails
    pub fn fallback() -> Self {
        Self::text_only(FALLBACK_TEXT)
    }

    /// Whether this envelope asks for any store mutation
    pub fn is_mutation(&self) -> bool {
        self.action.is_some() || self.itinerary_update.is_some()
    }

    /// The full item proposed by a create or update action, if any.
    /// Delete actions and bulk updates yield None.
    pub fn proposed_item(&self) -> Option<&ItineraryItem> {
        match self.action {
            Some(ItineraryAction::CreateItem) | Some(ItineraryAction::UpdateItem) => {
                self.action_data.as_ref().and_then(ActionData::as_item)
            }
            _ => None,
        }
    }
}
