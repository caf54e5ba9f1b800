//! Weight history ledger
//!
//! An append/remove/update log of dated weight observations. The
//! logical view is ordered by timestamp, most recent first.
//!
//! The ledger is a value: every mutation builds a new ledger and leaves
//! the old one intact, so a reader holding a clone never observes a
//! half-applied change. Cloning is an `Arc` increment.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{WeightEntry, WeightEntryUpdate};

/// Ordered, immutable collection of weight entries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightHistoryLedger {
    entries: Arc<Vec<WeightEntry>>,
}

impl WeightHistoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from entries in any order
    pub fn from_entries(mut entries: Vec<WeightEntry>) -> Self {
        sort_newest_first(&mut entries);
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Entries, most recent first
    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&WeightEntry> {
        self.entries.first()
    }

    /// Oldest entry; its weight is the starting point for progress
    pub fn oldest(&self) -> Option<&WeightEntry> {
        self.entries.last()
    }

    pub fn get(&self, id: Uuid) -> Option<&WeightEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Up to `n` most recent entries, most recent first
    pub fn recent(&self, n: usize) -> &[WeightEntry] {
        &self.entries[..self.entries.len().min(n)]
    }

    /// Number of entries recorded at or after `since`
    pub fn count_since(&self, since: DateTime<Utc>) -> usize {
        self.entries
            .iter()
            .filter(|e| e.recorded_at >= since)
            .count()
    }

    /// New ledger with `entry` inserted at its timestamp
    ///
    /// A back-dated entry does not displace anything: it takes over the
    /// displaced weight of its newer neighbour, which now displaces the
    /// inserted weight.
    pub fn with_entry(&self, mut entry: WeightEntry) -> Self {
        let index = self
            .entries
            .iter()
            .position(|e| e.recorded_at <= entry.recorded_at)
            .unwrap_or(self.entries.len());
        let mut entries = self.entries.as_ref().clone();
        if index > 0 {
            entry.displaced_weight = entries[index - 1].displaced_weight;
            entries[index - 1].displaced_weight = Some(entry.weight);
        }
        entries.insert(index, entry);
        Self {
            entries: Arc::new(entries),
        }
    }

    /// New ledger without the entry `id`, plus the removed entry
    ///
    /// The next newer entry inherits the removed entry's displaced
    /// weight so the chain of displaced weights stays intact. Returns
    /// `None` when no entry has that id.
    pub fn without(&self, id: Uuid) -> Option<(Self, WeightEntry)> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        let mut entries = self.entries.as_ref().clone();
        let removed = entries.remove(index);
        if index > 0 {
            entries[index - 1].displaced_weight = removed.displaced_weight;
        }
        Some((
            Self {
                entries: Arc::new(entries),
            },
            removed,
        ))
    }

    /// New ledger with the update merged into entry `id`
    ///
    /// Returns `None` when no entry has that id.
    ///
    /// When a new timestamp reorders the view, the displaced weights are
    /// relinked along the new order: the oldest entry keeps the weight
    /// that preceded the whole history, every other entry displaces its
    /// older neighbour.
    pub fn with_update(&self, id: Uuid, update: &WeightEntryUpdate) -> Option<Self> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        let baseline = self.oldest().and_then(|e| e.displaced_weight);
        let mut entries = self.entries.as_ref().clone();
        entries[index] = entries[index].apply(update);
        sort_newest_first(&mut entries);

        let reordered = entries
            .iter()
            .zip(self.entries.iter())
            .any(|(a, b)| a.id != b.id);
        if reordered {
            relink_displaced(&mut entries, baseline);
        }
        Some(Self {
            entries: Arc::new(entries),
        })
    }

    /// Owned copy of the entries for serialization
    pub fn to_vec(&self) -> Vec<WeightEntry> {
        self.entries.as_ref().clone()
    }
}

fn sort_newest_first(entries: &mut [WeightEntry]) {
    // stable: ties keep their current order
    entries.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
}

fn relink_displaced(entries: &mut [WeightEntry], baseline: Option<f64>) {
    let older: Vec<Option<f64>> = entries
        .iter()
        .skip(1)
        .map(|e| Some(e.weight))
        .chain(std::iter::once(baseline))
        .collect();
    for (entry, displaced) in entries.iter_mut().zip(older) {
        entry.displaced_weight = displaced;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn entry_at(weight: f64, days: i64) -> WeightEntry {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        WeightEntry::record(None, weight, None, None, base + Duration::days(days))
    }

    #[test]
    fn test_entries_sorted_newest_first() {
        let ledger =
            WeightHistoryLedger::from_entries(vec![entry_at(70.0, 0), entry_at(68.0, 2), entry_at(69.0, 1)]);
        let weights: Vec<f64> = ledger.entries().iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![68.0, 69.0, 70.0]);
        assert_eq!(ledger.latest().map(|e| e.weight), Some(68.0));
        assert_eq!(ledger.oldest().map(|e| e.weight), Some(70.0));
    }

    #[test]
    fn test_with_entry_leaves_original_untouched() {
        let ledger = WeightHistoryLedger::new().with_entry(entry_at(70.0, 0));
        let next = ledger.with_entry(entry_at(69.5, 1));
        assert_eq!(ledger.len(), 1);
        assert_eq!(next.len(), 2);
        assert_eq!(next.latest().map(|e| e.weight), Some(69.5));
    }

    #[test]
    fn test_back_dated_entry_splices_into_displaced_chain() {
        let mut newer = entry_at(69.0, 5);
        newer.displaced_weight = Some(72.0);
        let ledger = WeightHistoryLedger::new().with_entry(newer);

        let older = entry_at(70.5, 1);
        let older_id = older.id;
        let next = ledger.with_entry(older);

        assert_eq!(next.latest().unwrap().displaced_weight, Some(70.5));
        assert_eq!(next.oldest().unwrap().id, older_id);
        assert_eq!(next.oldest().unwrap().displaced_weight, Some(72.0));

        let (restored, _) = next.without(older_id).unwrap();
        assert_eq!(restored, ledger);
    }

    #[test]
    fn test_without_missing_id_is_none() {
        let ledger = WeightHistoryLedger::new().with_entry(entry_at(70.0, 0));
        assert!(ledger.without(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_without_relinks_displaced_weight() {
        let mut older = entry_at(70.0, 0);
        older.displaced_weight = Some(72.0);
        let mut newer = entry_at(69.0, 1);
        newer.displaced_weight = Some(70.0);
        let older_id = older.id;

        let ledger = WeightHistoryLedger::from_entries(vec![older, newer]);
        let (next, removed) = ledger.without(older_id).unwrap();

        assert_eq!(removed.weight, 70.0);
        assert_eq!(next.len(), 1);
        assert_eq!(next.latest().unwrap().displaced_weight, Some(72.0));
    }

    #[test]
    fn test_with_update_merges_and_resorts() {
        let first = entry_at(70.0, 0);
        let second = entry_at(69.0, 1);
        let first_id = first.id;
        let ledger = WeightHistoryLedger::from_entries(vec![first, second]);

        let update = WeightEntryUpdate {
            recorded_at: Some(Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap()),
            note: Some("after holiday".to_string()),
            ..Default::default()
        };
        let next = ledger.with_update(first_id, &update).unwrap();

        let latest = next.latest().unwrap();
        assert_eq!(latest.id, first_id);
        assert_eq!(latest.weight, 70.0);
        assert_eq!(latest.note.as_deref(), Some("after holiday"));
        assert!(ledger.with_update(Uuid::new_v4(), &update).is_none());
    }

    #[test]
    fn test_count_since() {
        let ledger = WeightHistoryLedger::from_entries((0..10).map(|d| entry_at(70.0, d)).collect());
        let since = Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();
        assert_eq!(ledger.count_since(since), 7);
        assert_eq!(ledger.recent(3).len(), 3);
        assert_eq!(ledger.recent(30).len(), 10);
    }
}
