//! Semantic validation of parsed provider payloads
//!
//! Walks the JSON explicitly before any typed conversion so every
//! rejection names the offending field path and the rule it broke
//! (`itineraryUpdate[2].time`, `must match HH:MM`). Validation is
//! all-or-nothing: one bad item rejects the whole payload, because a
//! half-applied model reply is worse than a clean fallback.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{DurationHours, ItemKind, ItineraryItem, ResponseEnvelope};

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}$").unwrap());

/// A payload field broke a protocol rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema violation at {field}: {rule}")]
pub struct SchemaViolation {
    /// Path to the offending field, e.g. `itineraryUpdate[2].time`
    pub field: String,
    /// The rule it broke, in plain words
    pub rule: String,
}

fn violation(field: impl Into<String>, rule: impl Into<String>) -> SchemaViolation {
    SchemaViolation { field: field.into(), rule: rule.into() }
}

/// Validate a chat-turn payload and convert it to a typed envelope
pub fn validate_envelope(payload: &Value) -> Result<ResponseEnvelope, SchemaViolation> {
    let obj = payload
        .as_object()
        .ok_or_else(|| violation("$", "expected a JSON object"))?;

    let text = obj
        .get("text")
        .filter(|v| !v.is_null())
        .ok_or_else(|| violation("text", "is required"))?;
    let text = text
        .as_str()
        .ok_or_else(|| violation("text", "must be a string"))?;
    if text.trim().is_empty() {
        return Err(violation("text", "must not be empty"));
    }

    let action = match obj.get("action").filter(|v| !v.is_null()) {
        None => None,
        Some(v) => {
            let verb = v
                .as_str()
                .ok_or_else(|| violation("action", "must be a string"))?;
            if !matches!(verb, "create_item" | "update_item" | "delete_item") {
                return Err(violation(
                    "action",
                    format!(
                        "unknown action {verb:?}: expected create_item, update_item, or delete_item"
                    ),
                ));
            }
            Some(verb)
        }
    };

    let action_data = obj.get("actionData").filter(|v| !v.is_null());
    match (action, action_data) {
        (Some(_), None) => {
            return Err(violation("actionData", "is required when action is set"));
        }
        (None, Some(_)) => {
            return Err(violation("action", "is required when actionData is set"));
        }
        _ => {}
    }

    let update = match obj.get("itineraryUpdate").filter(|v| !v.is_null()) {
        None => None,
        Some(v) => Some(v.as_array().ok_or_else(|| {
            violation("itineraryUpdate", "must be an array of itinerary items")
        })?),
    };

    if action.is_some() && update.is_some() {
        return Err(violation(
            "itineraryUpdate",
            "cannot be combined with a single-item action",
        ));
    }

    match (action, action_data) {
        (Some("create_item" | "update_item"), Some(data)) => {
            validate_item(data, "actionData")?;
        }
        (Some("delete_item"), Some(data)) => {
            let target = data
                .as_object()
                .ok_or_else(|| violation("actionData", "must be an object"))?;
            let id = target.get("id").filter(|v| !v.is_null()).ok_or_else(|| {
                violation("actionData.id", "is required for delete_item")
            })?;
            if id.as_i64().is_none() {
                return Err(violation("actionData.id", "must be an integer"));
            }
        }
        _ => {}
    }

    if let Some(items) = update {
        for (i, item) in items.iter().enumerate() {
            validate_item(item, &format!("itineraryUpdate[{i}]"))?;
        }
    }

    serde_json::from_value(payload.clone())
        .map_err(|e| violation("$", format!("payload does not convert: {e}")))
}

/// Validate a bulk-generation payload, a bare array of itinerary items
pub fn validate_item_list(payload: &Value) -> Result<Vec<ItineraryItem>, SchemaViolation> {
    let items = payload
        .as_array()
        .ok_or_else(|| violation("items", "expected a JSON array"))?;

    for (i, item) in items.iter().enumerate() {
        validate_item(item, &format!("items[{i}]"))?;
    }

    serde_json::from_value(payload.clone())
        .map_err(|e| violation("items", format!("payload does not convert: {e}")))
}

/// Check all ten fields of one itinerary item at `path`
fn validate_item(value: &Value, path: &str) -> Result<(), SchemaViolation> {
    let obj = value
        .as_object()
        .ok_or_else(|| violation(path, "must be an object"))?;

    let id = require(obj, path, "id")?;
    if id.as_i64().is_none() {
        return Err(violation(format!("{path}.id"), "must be an integer"));
    }

    let date = require_str(obj, path, "date")?;
    if !DATE_RE.is_match(date) {
        return Err(violation(format!("{path}.date"), "must match YYYY-MM-DD"));
    }
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(violation(format!("{path}.date"), "is not a real calendar date"));
    }

    let time = require_str(obj, path, "time")?;
    if !TIME_RE.is_match(time) {
        return Err(violation(format!("{path}.time"), "must match HH:MM"));
    }
    if NaiveTime::parse_from_str(time, "%H:%M").is_err() {
        return Err(violation(format!("{path}.time"), "is not a valid time of day"));
    }

    let duration = require_str(obj, path, "duration")?;
    if DurationHours::from_str(duration).is_err() {
        return Err(violation(
            format!("{path}.duration"),
            "must match \"<number> hour(s)\" with a positive value",
        ));
    }

    for name in ["location", "address", "activity"] {
        let text = require_str(obj, path, name)?;
        if text.trim().is_empty() {
            return Err(violation(format!("{path}.{name}"), "must not be empty"));
        }
    }

    let kind = require_str(obj, path, "type")?;
    if ItemKind::from_str(kind).is_err() {
        let allowed = ItemKind::ALL.map(|k| k.as_str()).join(", ");
        return Err(violation(
            format!("{path}.type"),
            format!("must be one of: {allowed}"),
        ));
    }

    let rating = require(obj, path, "rating")?;
    let rating = rating
        .as_f64()
        .ok_or_else(|| violation(format!("{path}.rating"), "must be a number"))?;
    if !(0.0..=5.0).contains(&rating) {
        return Err(violation(format!("{path}.rating"), "must be between 0 and 5"));
    }

    let coords = require(obj, path, "coordinates")?;
    let coords = coords.as_object().ok_or_else(|| {
        violation(format!("{path}.coordinates"), "must be an object with lat and lng")
    })?;
    let lat = coords
        .get("lat")
        .and_then(Value::as_f64)
        .ok_or_else(|| violation(format!("{path}.coordinates.lat"), "must be a number"))?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(violation(
            format!("{path}.coordinates.lat"),
            "must be between -90 and 90",
        ));
    }
    let lng = coords
        .get("lng")
        .and_then(Value::as_f64)
        .ok_or_else(|| violation(format!("{path}.coordinates.lng"), "must be a number"))?;
    if !(-180.0..=180.0).contains(&lng) {
        return Err(violation(
            format!("{path}.coordinates.lng"),
            "must be between -180 and 180",
        ));
    }

    Ok(())
}

fn require<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    name: &str,
) -> Result<&'a Value, SchemaViolation> {
    obj.get(name)
        .filter(|v| !v.is_null())
        .ok_or_else(|| violation(format!("{path}.{name}"), "is required"))
}

fn require_str<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    name: &str,
) -> Result<&'a str, SchemaViolation> {
    require(obj, path, name)?
        .as_str()
        .ok_or_else(|| violation(format!("{path}.{name}"), "must be a string"))
}
