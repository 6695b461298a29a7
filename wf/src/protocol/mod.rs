//! The itinerary-mutation protocol
//!
//! One conversational turn moves through this module as a pipeline:
//! compose the prompt, parse the provider's reply, validate it against
//! the envelope schema, detect schedule conflicts, apply the mutation.
//! Each stage is a standalone piece so the planner can reorder error
//! handling around them and tests can exercise one stage at a time.

mod applier;
mod composer;
mod conflict;
mod parser;
mod validator;

pub use applier::{apply, ApplyError, MutationOutcome};
pub use composer::PromptComposer;
pub use conflict::find_conflicts;
pub use parser::{parse_payload, ParseError};
pub use validator::{validate_envelope, validate_item_list, SchemaViolation};
