//! Planning entry points built on the protocol pipeline
//!
//! Two paths share the same parse/validate stages: the conversational
//! turn, which mutates one item at a time, and the one-shot bulk
//! generator that plans a whole trip up front.

mod bulk;
mod conversation;

pub use bulk::{BulkItineraryGenerator, ItineraryInventory, TripPlanRequest, MAX_BULK_ITEMS};
pub use conversation::{ItineraryPlanner, TurnReply};

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::StoreError;
use crate::llm::ProviderError;
use crate::protocol::{ParseError, SchemaViolation};

/// A planning call failed before, during, or after the provider round-trip
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("prompt composition failed: {0}")]
    Prompt(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Schema(#[from] SchemaViolation),
    #[error("end date {end} is before start date {start}")]
    EmptyDateRange { start: NaiveDate, end: NaiveDate },
    #[error("the model produced {count} items, over the {max} item cap")]
    TooManyItems { count: usize, max: u32 },
    #[error(transparent)]
    Store(#[from] StoreError),
}
