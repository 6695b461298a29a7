//! Wayfarer - conversational travel itinerary planner
//!
//! Wayfarer plans a trip in two gears: one-shot generation of a complete
//! itinerary from the trip dates, then chat turns that each change exactly
//! one thing (add, move, drop, or rebuild) through a strict JSON protocol.
//!
//! # Core Concepts
//!
//! - **The itinerary is the prompt**: every turn re-sends the full stored
//!   schedule as the model's only source of truth; the provider holds no
//!   session state
//! - **Validated mutations**: a reply either passes the envelope schema or
//!   the turn degrades to a harmless fallback; nothing half-applied ever
//!   reaches the store
//! - **Conflicts advise, never block**: overlapping time windows are
//!   reported alongside the change, not enforced
//!
//! # Modules
//!
//! - [`domain`] - envelope, conversation, and preference types
//! - [`protocol`] - compose, parse, validate, conflict-check, apply
//! - [`llm`] - GenerationClient trait and the Gemini implementation
//! - [`planner`] - conversational and bulk planning entry points
//! - [`prompts`] - embedded templates with filesystem overrides
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface
//! - [`repl`] - the interactive chat session

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod planner;
pub mod prompts;
pub mod protocol;
pub mod repl;

// Re-export commonly used types
pub use config::{Config, LlmConfig, PromptsConfig, StorageConfig};
pub use domain::{
    recent_turns, ActionData, ConversationTurn, ItemRef, ItineraryAction, ResponseEnvelope,
    Role, TripPreferences, FALLBACK_TEXT, HISTORY_WINDOW,
};
pub use llm::{create_client, GeminiClient, GenerationClient, ProviderError};
pub use planner::{
    BulkItineraryGenerator, ItineraryInventory, ItineraryPlanner, PlannerError, TripPlanRequest,
    TurnReply, MAX_BULK_ITEMS,
};
pub use prompts::PromptLoader;
pub use protocol::{
    apply, find_conflicts, parse_payload, validate_envelope, validate_item_list, ApplyError,
    MutationOutcome, ParseError, PromptComposer, SchemaViolation,
};
pub use repl::ChatSession;
