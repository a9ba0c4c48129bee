//! In-memory search index over item records.
//!
//! The index is derived state: it is rebuilt from the store at startup and
//! receives single-record deltas as ingests commit. It holds full record
//! copies so the query path never touches the database, and a query only
//! needs a brief read lock (writers hold the lock for one record's delta).

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::store::ItemRecord;

/// How a record matched the query text. Lower ranks sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchRank {
    Exact,
    Prefix,
    Substring,
}

struct IndexedItem {
    /// Case-normalized item name, matched against normalized query text.
    name_norm: String,
    record: ItemRecord,
}

/// Text search index over item records.
///
/// Matching is case-insensitive. Exact name matches rank above prefix
/// matches, which rank above substring matches; ties break by ascending id.
pub struct SearchIndex {
    // BTreeMap keeps iteration in id order, which makes tie-breaking free.
    entries: RwLock<BTreeMap<i64, IndexedItem>>,
}

impl SearchIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Replace the whole index contents. Used at startup to load the store.
    pub fn rebuild(&self, records: Vec<ItemRecord>) {
        let mut fresh = BTreeMap::new();
        for record in records {
            fresh.insert(record.id, Self::index_entry(record));
        }
        let mut entries = self.entries.write().unwrap();
        *entries = fresh;
    }

    /// Upsert the index entry for one record.
    pub fn update(&self, record: &ItemRecord) {
        let entry = Self::index_entry(record.clone());
        let mut entries = self.entries.write().unwrap();
        entries.insert(record.id, entry);
    }

    /// Query the index, returning up to `limit` matching records in rank
    /// order. An empty or whitespace-only query returns no results.
    pub fn query(&self, text: &str, limit: usize) -> Vec<ItemRecord> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let entries = self.entries.read().unwrap();

        let mut matches: Vec<(MatchRank, &IndexedItem)> = entries
            .values()
            .filter_map(|item| Self::rank(&item.name_norm, &needle).map(|rank| (rank, item)))
            .collect();

        // Entries iterate in id order, so a stable sort by rank keeps the
        // ascending-id tie break.
        matches.sort_by_key(|(rank, _)| *rank);

        matches
            .into_iter()
            .take(limit)
            .map(|(_, item)| item.record.clone())
            .collect()
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn index_entry(record: ItemRecord) -> IndexedItem {
        IndexedItem {
            name_norm: record.name.to_lowercase(),
            record,
        }
    }

    fn rank(name_norm: &str, needle: &str) -> Option<MatchRank> {
        if name_norm == needle {
            Some(MatchRank::Exact)
        } else if name_norm.starts_with(needle) {
            Some(MatchRank::Prefix)
        } else if name_norm.contains(needle) {
            Some(MatchRank::Substring)
        } else {
            None
        }
    }
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Trend;
    use chrono::Utc;

    fn record(id: i64, name: &str) -> ItemRecord {
        let now = Utc::now();
        ItemRecord {
            id,
            name: name.to_string(),
            description: String::new(),
            item_type: "Melee weapons".to_string(),
            icon: String::new(),
            icon_large: String::new(),
            members: false,
            current_price: 100,
            current_trend: Trend::Neutral,
            today_price_change: 0,
            today_trend: Trend::Neutral,
            first_ingested_at: now,
            last_ingested_at: now,
            ingest_count: 1,
        }
    }

    fn index_with(names: &[(i64, &str)]) -> SearchIndex {
        let index = SearchIndex::new();
        for (id, name) in names {
            index.update(&record(*id, name));
        }
        index
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let index = index_with(&[(1, "Rune axe")]);
        assert!(index.query("", 50).is_empty());
        assert!(index.query("   ", 50).is_empty());
    }

    #[test]
    fn test_prefix_query_matches_both() {
        let index = index_with(&[(1, "Rune axe"), (2, "Rune sword")]);
        let results = index.query("rune", 50);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_longer_prefix_narrows() {
        let index = index_with(&[(1, "Rune axe"), (2, "Rune sword")]);
        let results = index.query("Rune a", 50);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Rune axe");
    }

    #[test]
    fn test_case_insensitive() {
        let index = index_with(&[(1, "Abyssal whip")]);
        assert_eq!(index.query("ABYSSAL", 50).len(), 1);
        assert_eq!(index.query("abyssal whip", 50).len(), 1);
    }

    #[test]
    fn test_exact_before_prefix_before_substring() {
        let index = index_with(&[
            (10, "Dragon axe ornament"),
            (20, "Axe"),
            (30, "Axe handle"),
        ]);

        let results = index.query("axe", 50);
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Axe", "Axe handle", "Dragon axe ornament"]);
    }

    #[test]
    fn test_ties_break_by_ascending_id() {
        let index = index_with(&[(7, "Rune sword"), (3, "Rune axe"), (5, "Rune mace")]);

        let results = index.query("rune", 50);
        let ids: Vec<i64> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 5, 7]);
    }

    #[test]
    fn test_respects_limit() {
        let index = index_with(&[(1, "Rune axe"), (2, "Rune sword"), (3, "Rune mace")]);
        assert_eq!(index.query("rune", 2).len(), 2);
    }

    #[test]
    fn test_update_replaces_entry() {
        let index = index_with(&[(1, "Rune axe")]);

        let mut updated = record(1, "Rune axe");
        updated.current_price = 999;
        index.update(&updated);

        assert_eq!(index.len(), 1);
        let results = index.query("rune axe", 50);
        assert_eq!(results[0].current_price, 999);
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let index = index_with(&[(1, "Rune axe"), (2, "Rune sword")]);

        index.rebuild(vec![record(9, "Bronze dagger")]);

        assert_eq!(index.len(), 1);
        assert!(index.query("rune", 50).is_empty());
        assert_eq!(index.query("bronze", 50).len(), 1);
    }

    #[test]
    fn test_no_match() {
        let index = index_with(&[(1, "Rune axe")]);
        assert!(index.query("dragon", 50).is_empty());
    }
}
