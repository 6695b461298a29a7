//! The itinerary item record
//!
//! `ItineraryItem` is the unit every store operation moves around. Its serde
//! representation is the wire schema shared with the planning protocol:
//! dates as `YYYY-MM-DD`, times as 24h `HH:MM`, durations as
//! "`<number>` hour(s)", and the item category under the JSON key `type`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A single scheduled entry in a trip's itinerary.
///
/// All ten fields are mandatory; a partial item is invalid rather than
/// "an item with defaults". Items are unique by `id` within a trip and
/// ordered by `(date, time)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryItem {
    /// Unique numeric identifier within the trip
    pub id: i64,

    /// Day of the visit (serialized `YYYY-MM-DD`)
    pub date: NaiveDate,

    /// Start time, 24h clock (serialized `HH:MM`)
    #[serde(with = "wire_time")]
    pub time: NaiveTime,

    /// Venue name
    pub location: String,

    /// Street address of the venue
    pub address: String,

    /// What the traveler does there
    pub activity: String,

    /// How long the visit lasts
    pub duration: DurationHours,

    /// Item category (serialized under the JSON key `type`)
    #[serde(rename = "type")]
    pub kind: ItemKind,

    /// Star rating, 0 to 5
    pub rating: f64,

    /// Venue position in map-provider literal form
    pub coordinates: Coordinates,
}

impl ItineraryItem {
    /// Ordering key for the canonical (date, time) itinerary order.
    /// Id breaks ties so the order is total.
    pub fn sort_key(&self) -> (NaiveDate, NaiveTime, i64) {
        (self.date, self.time, self.id)
    }

    /// Start of the visit in minutes from midnight of `self.date`.
    pub fn start_minutes(&self) -> i64 {
        i64::from(self.time.hour()) * 60 + i64::from(self.time.minute())
    }

    /// End of the visit in minutes from midnight of `self.date`.
    /// May exceed 24*60 for visits running past midnight.
    pub fn end_minutes(&self) -> i64 {
        self.start_minutes() + self.duration.minutes()
    }
}

/// Sort items into the canonical (date, time, id) order.
pub fn sort_items(items: &mut [ItineraryItem]) {
    items.sort_by_key(|item| item.sort_key());
}

mod wire_time {
    //! `HH:MM` serde format for [`chrono::NaiveTime`]

    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M")
            .map_err(|_| serde::de::Error::custom(format!("invalid HH:MM time: {:?}", s)))
    }
}

/// Visit length in hours, carried on the wire as "`<number>` hour(s)".
///
/// Fractional values are allowed ("1.5 hours"); the value must be a plain
/// decimal number greater than zero. Parsing is strict by intent - this is
/// the grammar the model is instructed to follow, and anything looser would
/// mask protocol drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationHours(f64);

impl DurationHours {
    /// Construct from an hour count. Returns None unless finite and > 0.
    pub fn new(hours: f64) -> Option<Self> {
        if hours.is_finite() && hours > 0.0 {
            Some(Self(hours))
        } else {
            None
        }
    }

    /// The raw hour count
    pub fn hours(&self) -> f64 {
        self.0
    }

    /// Whole minutes (rounded)
    pub fn minutes(&self) -> i64 {
        (self.0 * 60.0).round() as i64
    }
}

impl fmt::Display for DurationHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if (self.0 - 1.0).abs() < f64::EPSILON {
            write!(f, "1 hour")
        } else if self.0.fract() == 0.0 {
            write!(f, "{} hours", self.0 as i64)
        } else {
            write!(f, "{} hours", self.0)
        }
    }
}

/// Error from parsing a duration string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid duration {0:?}: expected \"<number> hour(s)\"")]
pub struct DurationParseError(pub String);

impl FromStr for DurationHours {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DurationParseError(s.to_string());
        let trimmed = s.trim();

        let number = trimmed
            .strip_suffix(" hours")
            .or_else(|| trimmed.strip_suffix(" hour"))
            .ok_or_else(err)?;

        // Grammar is digits with at most one interior dot: "2", "1.5", "0.75".
        // f64::from_str alone would admit ".5", "1e3", "inf".
        let mut parts = number.splitn(2, '.');
        let whole = parts.next().unwrap_or("");
        let frac = parts.next();
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        if let Some(frac) = frac
            && (frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(err());
        }

        let hours: f64 = number.parse().map_err(|_| err())?;
        DurationHours::new(hours).ok_or_else(err)
    }
}

impl Serialize for DurationHours {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DurationHours {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Activity,
    Museum,
    Shopping,
    Landmark,
    Restaurant,
    Outdoor,
    Accommodation,
}

impl ItemKind {
    /// Every category, in protocol declaration order
    pub const ALL: [ItemKind; 7] = [
        ItemKind::Activity,
        ItemKind::Museum,
        ItemKind::Shopping,
        ItemKind::Landmark,
        ItemKind::Restaurant,
        ItemKind::Outdoor,
        ItemKind::Accommodation,
    ];

    /// The wire spelling of this category
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Activity => "activity",
            ItemKind::Museum => "museum",
            ItemKind::Shopping => "shopping",
            ItemKind::Landmark => "landmark",
            ItemKind::Restaurant => "restaurant",
            ItemKind::Outdoor => "outdoor",
            ItemKind::Accommodation => "accommodation",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

/// Venue position, `{ "lat": .., "lng": .. }` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Whether both components are inside the valid geographic ranges
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> ItineraryItem {
        ItineraryItem {
            id: 3,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            location: "Musee d'Orsay".to_string(),
            address: "1 Rue de la Legion d'Honneur, 75007 Paris".to_string(),
            activity: "Impressionist collection".to_string(),
            duration: DurationHours::new(2.5).unwrap(),
            kind: ItemKind::Museum,
            rating: 4.7,
            coordinates: Coordinates { lat: 48.8600, lng: 2.3266 },
        }
    }

    #[test]
    fn test_item_wire_format() {
        let json = serde_json::to_value(sample_item()).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["date"], "2024-06-01");
        assert_eq!(json["time"], "09:30");
        assert_eq!(json["duration"], "2.5 hours");
        assert_eq!(json["type"], "museum");
        assert_eq!(json["rating"], 4.7);
        assert_eq!(json["coordinates"]["lat"], 48.86);
        assert_eq!(json["coordinates"]["lng"], 2.3266);
    }

    #[test]
    fn test_item_roundtrip() {
        let item = sample_item();
        let json = serde_json::to_string(&item).unwrap();
        let back: ItineraryItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }

    #[test]
    fn test_time_rejects_seconds() {
        let mut json = serde_json::to_value(sample_item()).unwrap();
        json["time"] = serde_json::json!("09:30:00");
        let result: Result<ItineraryItem, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(DurationHours::new(1.0).unwrap().to_string(), "1 hour");
        assert_eq!(DurationHours::new(2.0).unwrap().to_string(), "2 hours");
        assert_eq!(DurationHours::new(1.5).unwrap().to_string(), "1.5 hours");
        assert_eq!(DurationHours::new(0.5).unwrap().to_string(), "0.5 hours");
    }

    #[test]
    fn test_duration_parse() {
        assert_eq!("1 hour".parse::<DurationHours>().unwrap().hours(), 1.0);
        assert_eq!("2 hours".parse::<DurationHours>().unwrap().hours(), 2.0);
        assert_eq!("1.5 hours".parse::<DurationHours>().unwrap().hours(), 1.5);
        assert_eq!("0.75 hours".parse::<DurationHours>().unwrap().minutes(), 45);
    }

    #[test]
    fn test_duration_parse_rejects_malformed() {
        for bad in [
            "2",
            "two hours",
            "2 minutes",
            "-1 hours",
            "0 hours",
            ".5 hours",
            "1e2 hours",
            "1. hours",
            "hours",
            "2  hours",
        ] {
            assert!(bad.parse::<DurationHours>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_item_kind_strings() {
        for kind in ItemKind::ALL {
            let parsed: ItemKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("hotel".parse::<ItemKind>().is_err());
        assert_eq!(serde_json::to_value(ItemKind::Accommodation).unwrap(), "accommodation");
    }

    #[test]
    fn test_coordinates_range() {
        assert!(Coordinates { lat: 48.86, lng: 2.33 }.in_range());
        assert!(Coordinates { lat: -90.0, lng: 180.0 }.in_range());
        assert!(!Coordinates { lat: 90.5, lng: 0.0 }.in_range());
        assert!(!Coordinates { lat: 0.0, lng: -180.01 }.in_range());
    }

    #[test]
    fn test_interval_minutes() {
        let item = sample_item();
        assert_eq!(item.start_minutes(), 9 * 60 + 30);
        assert_eq!(item.end_minutes(), 9 * 60 + 30 + 150);
    }

    #[test]
    fn test_sort_items() {
        let mut a = sample_item();
        a.id = 1;
        a.date = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        let mut b = sample_item();
        b.id = 2;
        b.time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let mut c = sample_item();
        c.id = 3;

        let mut items = vec![a.clone(), b.clone(), c.clone()];
        sort_items(&mut items);
        assert_eq!(
            items.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![2, 3, 1],
            "sorted by (date, time)"
        );
    }
}
