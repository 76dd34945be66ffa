//! Recent-search history maintenance.
//!
//! The recent list is most-recent-first, deduplicated by coordinate and capped
//! at [`MAX_RECENT_ENTRIES`]. Re-picking a place moves it to the front with a
//! fresh timestamp instead of creating a second entry.

use super::models::RecentEntry;

/// Upper bound on the number of recent entries kept.
pub const MAX_RECENT_ENTRIES: usize = 50;

/// Inserts `entry` at the front of `recent`.
///
/// Any earlier entry with an equal coordinate is removed first, and the list
/// is truncated to `cap` afterwards so the oldest entries fall off the end.
///
/// # Examples
///
/// ```
/// use wayfinder::domain::Coordinate;
/// use wayfinder::storage::{push_recent, RecentEntry};
///
/// let coordinate = Coordinate::new(40.0, -74.0).unwrap();
/// let entry = |id, timestamp| RecentEntry {
///     id,
///     name: "Somewhere".into(),
///     coordinate,
///     address: String::new(),
///     timestamp,
/// };
///
/// let mut recent = Vec::new();
/// push_recent(&mut recent, entry(1, 100), 50);
/// push_recent(&mut recent, entry(2, 200), 50);
/// assert_eq!(recent.len(), 1);
/// assert_eq!(recent[0].timestamp, 200);
/// ```
pub fn push_recent(recent: &mut Vec<RecentEntry>, entry: RecentEntry, cap: usize) {
    let before = recent.len();
    recent.retain(|existing| existing.coordinate != entry.coordinate);
    if recent.len() != before {
        tracing::trace!(coordinate = %entry.coordinate, "dropped duplicate recent entry");
    }

    recent.insert(0, entry);
    recent.truncate(cap);
}
