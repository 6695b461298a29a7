//! Schedule conflict detection
//!
//! Flags existing items whose time window overlaps a proposed item on the
//! same date. Conflicts are advisory: the planner reports them alongside
//! the mutation rather than blocking it, since travelers overbook on
//! purpose often enough (a market stroll during a long lunch window).

use crate::domain::ItineraryItem;

/// Existing items that overlap the proposed item's time window.
///
/// Windows are half-open, `[start, start + duration)` in minutes from
/// midnight, so an item ending exactly when another begins does not
/// conflict. Comparison stays within the proposed item's date: a window
/// running past midnight is not checked against the next day. The
/// proposed item's own id is skipped so updates do not conflict with the
/// slot they are replacing.
pub fn find_conflicts<'a>(
    proposed: &ItineraryItem,
    snapshot: &'a [ItineraryItem],
) -> Vec<&'a ItineraryItem> {
    snapshot
        .iter()
        .filter(|existing| existing.id != proposed.id)
        .filter(|existing| existing.date == proposed.date)
        .filter(|existing| overlaps(proposed, existing))
        .collect()
}

fn overlaps(a: &ItineraryItem, b: &ItineraryItem) -> bool {
    a.start_minutes() < b.end_minutes() && b.start_minutes() < a.end_minutes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, DurationHours, ItemKind};
    use chrono::{NaiveDate, NaiveTime};

    fn item(id: i64, date: &str, time: &str, hours: f64) -> ItineraryItem {
        ItineraryItem {
            id,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            duration: DurationHours::new(hours).unwrap(),
            location: "Somewhere".to_string(),
            address: "1 Some St".to_string(),
            activity: "Something".to_string(),
            kind: ItemKind::Activity,
            rating: 4.0,
            coordinates: Coordinates { lat: 0.0, lng: 0.0 },
        }
    }

    #[test]
    fn test_overlapping_item_is_flagged() {
        let snapshot = vec![item(1, "2024-06-01", "10:00", 2.0)];
        let proposed = item(2, "2024-06-01", "11:00", 1.0);

        let conflicts = find_conflicts(&proposed, &snapshot);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, 1);
    }

    #[test]
    fn test_adjacent_items_do_not_conflict() {
        // 10:00 + 2 hours ends exactly at 12:00
        let snapshot = vec![item(1, "2024-06-01", "10:00", 2.0)];
        let proposed = item(2, "2024-06-01", "12:00", 1.0);

        assert!(find_conflicts(&proposed, &snapshot).is_empty());
    }

    #[test]
    fn test_containment_is_a_conflict() {
        let snapshot = vec![item(1, "2024-06-01", "09:00", 8.0)];
        let proposed = item(2, "2024-06-01", "12:00", 1.0);

        assert_eq!(find_conflicts(&proposed, &snapshot).len(), 1);
    }

    #[test]
    fn test_other_dates_are_ignored() {
        let snapshot = vec![item(1, "2024-06-02", "10:00", 2.0)];
        let proposed = item(2, "2024-06-01", "10:00", 2.0);

        assert!(find_conflicts(&proposed, &snapshot).is_empty());
    }

    #[test]
    fn test_own_id_is_skipped() {
        // Moving item 1 within its old window must not conflict with itself
        let snapshot = vec![item(1, "2024-06-01", "10:00", 2.0)];
        let proposed = item(1, "2024-06-01", "10:30", 1.0);

        assert!(find_conflicts(&proposed, &snapshot).is_empty());
    }

    #[test]
    fn test_multiple_overlaps_are_all_reported() {
        let snapshot = vec![
            item(1, "2024-06-01", "09:00", 2.0),
            item(2, "2024-06-01", "10:30", 1.0),
            item(3, "2024-06-01", "14:00", 1.0),
        ];
        let proposed = item(9, "2024-06-01", "10:00", 1.0);

        let conflicts = find_conflicts(&proposed, &snapshot);
        let ids: Vec<i64> = conflicts.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_window_past_midnight_stays_on_its_date() {
        // 23:00 + 2 hours runs to 25:00 on the same calendar date; the
        // next morning's breakfast is not a conflict.
        let snapshot = vec![item(1, "2024-06-02", "00:30", 1.0)];
        let proposed = item(2, "2024-06-01", "23:00", 2.0);

        assert!(find_conflicts(&proposed, &snapshot).is_empty());
    }

    #[test]
    fn test_empty_snapshot() {
        let proposed = item(1, "2024-06-01", "10:00", 1.0);
        assert!(find_conflicts(&proposed, &[]).is_empty());
    }
}
