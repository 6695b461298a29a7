//! Property tests for the conflict detector and the item wire format

use chrono::{Days, NaiveDate, NaiveTime};
use itinstore::{Coordinates, DurationHours, ItemKind, ItineraryItem};
use proptest::prelude::*;
use wayfarer::find_conflicts;

/// Items confined to a two-day window so overlaps actually happen
fn arb_item() -> impl Strategy<Value = ItineraryItem> {
    (
        0..1000i64,
        0..2u64,
        (0..24u32, 0..60u32),
        1..=24u32,
        0..ItemKind::ALL.len(),
        0..=50u32,
    )
        .prop_map(|(id, day, (hour, minute), quarter_hours, kind, rating_tenths)| {
            ItineraryItem {
                id,
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap() + Days::new(day),
                time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
                duration: DurationHours::new(f64::from(quarter_hours) * 0.25).unwrap(),
                location: "Somewhere".to_string(),
                address: "1 Some St".to_string(),
                activity: "Something".to_string(),
                kind: ItemKind::ALL[kind],
                rating: f64::from(rating_tenths) / 10.0,
                coordinates: Coordinates { lat: 48.85, lng: 2.35 },
            }
        })
}

proptest! {
    /// Every advisory points at a real snapshot item on the proposed
    /// item's date, and never at the proposed item itself
    #[test]
    fn conflicts_are_drawn_from_the_snapshot(
        snapshot in prop::collection::vec(arb_item(), 0..10),
        proposed in arb_item(),
    ) {
        let conflicts = find_conflicts(&proposed, &snapshot);
        for conflict in conflicts {
            prop_assert!(snapshot.iter().any(|item| item == conflict));
            prop_assert_eq!(conflict.date, proposed.date);
            prop_assert_ne!(conflict.id, proposed.id);
        }
    }

    /// Overlap is mutual: if a collides with b, b collides with a
    #[test]
    fn conflict_detection_is_symmetric(a in arb_item(), b in arb_item()) {
        let a_hits_b = !find_conflicts(&a, std::slice::from_ref(&b)).is_empty();
        let b_hits_a = !find_conflicts(&b, std::slice::from_ref(&a)).is_empty();
        prop_assert_eq!(a_hits_b, b_hits_a);
    }

    /// An item survives a trip through its JSON wire form unchanged
    #[test]
    fn item_wire_roundtrip(item in arb_item()) {
        let json = serde_json::to_string(&item).unwrap();
        let back: ItineraryItem = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, item);
    }
}
