//! Traveler preferences
//!
//! A typed bag of optional steering inputs. Preferences only ever shape the
//! prompt; they are never persisted with the itinerary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TripPreferences {
    /// Travel pace, e.g. "relaxed" or "packed"
    pub pace: Option<String>,

    /// Budget guidance, e.g. "shoestring" or "no limit"
    pub budget: Option<String>,

    /// Topics to favor when proposing activities
    pub interests: Vec<String>,

    /// Dietary constraints for restaurant picks
    pub dietary: Option<String>,

    /// Anything else the traveler wants honored
    pub notes: Option<String>,
}

impl TripPreferences {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// One human-readable line per set preference, for prompt embedding
    pub fn prompt_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(pace) = &self.pace {
            lines.push(format!("Pace: {pace}"));
        }
        if let Some(budget) = &self.budget {
            lines.push(format!("Budget: {budget}"));
        }
        if !self.interests.is_empty() {
            lines.push(format!("Interests: {}", self.interests.join(", ")));
        }
        if let Some(dietary) = &self.dietary {
            lines.push(format!("Dietary: {dietary}"));
        }
        if let Some(notes) = &self.notes {
            lines.push(format!("Notes: {notes}"));
        }
        lines
    }
}
