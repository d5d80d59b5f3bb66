//! Raw table → ordered study groups.
//!
//! ## Algorithm
//!
//! 1. Flatten the table into `row_id + col_id → value` candidates.
//! 2. Drop blank cells, the empty marker (default `"."`), and keys that are
//!    not exactly two characters.
//! 3. Flag entries whose key touches the defer set (default `A E R`). Those
//!    pairs are the hardest to visualise and are learned last.
//! 4. Rank every entry by key (stable, so duplicates keep table order), scale
//!    deferred ranks past every primary rank, and re-rank densely.
//! 5. Primary entries form one group per first character; all deferred
//!    entries form a single trailing [`GroupName::Deferred`] group.
//!
//! The whole pipeline is deterministic: no RNG is involved.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::drill_engine::{
    models::{AssociationEntry, Group, GroupName},
    table::TabularSource,
};

pub const DEFAULT_DEFER_SET: &str = "AER";
pub const DEFAULT_EMPTY_MARKER: &str = ".";

/// Minimum multiplier applied to deferred base ranks. Grown to `n + 1` for
/// larger tables so the deferred block always sorts last.
pub const DEFER_RANK_FACTOR: u64 = 100;

/// Characters that push a key into the deferred group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferSet {
    chars: BTreeSet<char>,
}

impl DeferSet {
    /// Build from the characters of `chars`, ignoring whitespace and case.
    pub fn new(chars: &str) -> Self {
        DeferSet {
            chars: chars
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| c.to_ascii_uppercase())
                .collect(),
        }
    }

    /// Nothing is deferred.
    pub fn empty() -> Self {
        DeferSet { chars: BTreeSet::new() }
    }

    pub fn is_deferred(&self, key: &str) -> bool {
        key.chars().any(|c| self.chars.contains(&c.to_ascii_uppercase()))
    }
}

impl Default for DeferSet {
    fn default() -> Self {
        DeferSet::new(DEFAULT_DEFER_SET)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionOptions {
    pub defer: DeferSet,
    /// Cell value meaning "no association for this pair".
    pub empty_marker: String,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        PartitionOptions {
            defer: DeferSet::default(),
            empty_marker: DEFAULT_EMPTY_MARKER.to_string(),
        }
    }
}

/// An entry with its class and final dense rank (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub entry: AssociationEntry,
    pub deferred: bool,
    pub rank: usize,
}

/// Flatten a table into entries, silently dropping unusable cells.
pub fn flatten<S: TabularSource + ?Sized>(source: &S, empty_marker: &str) -> Vec<AssociationEntry> {
    let mut dropped = 0usize;
    let entries: Vec<AssociationEntry> = source
        .cells()
        .into_iter()
        .filter_map(|cell| {
            let key = format!("{}{}", cell.row_id.trim(), cell.col_id.trim());
            let reference = cell.value.as_deref().map(str::trim).unwrap_or_default();
            if reference.is_empty() || reference == empty_marker || key.chars().count() != 2 {
                dropped += 1;
                return None;
            }
            Some(AssociationEntry::new(key, reference))
        })
        .collect();

    debug!(kept = entries.len(), dropped, "Flattened association table");
    entries
}

/// Order entries primary-first, each class in key order.
pub fn rank_entries(entries: Vec<AssociationEntry>, defer: &DeferSet) -> Vec<RankedEntry> {
    let n = entries.len();

    // Stable sort: equal keys keep their table order.
    let mut by_key: Vec<usize> = (0..n).collect();
    by_key.sort_by(|&a, &b| entries[a].key.cmp(&entries[b].key));

    let mut base_rank = vec![0u64; n];
    for (pos, &idx) in by_key.iter().enumerate() {
        base_rank[idx] = pos as u64 + 1;
    }

    let deferred: Vec<bool> = entries.iter().map(|e| defer.is_deferred(&e.key)).collect();
    let factor = DEFER_RANK_FACTOR.max(n as u64 + 1);
    let adjusted: Vec<u64> = (0..n)
        .map(|i| if deferred[i] { base_rank[i] * factor } else { base_rank[i] })
        .collect();

    let mut final_order: Vec<usize> = (0..n).collect();
    final_order.sort_by_key(|&idx| adjusted[idx]);

    let mut slots: Vec<Option<AssociationEntry>> = entries.into_iter().map(Some).collect();
    final_order
        .into_iter()
        .enumerate()
        .filter_map(|(pos, idx)| {
            slots[idx].take().map(|entry| RankedEntry {
                entry,
                deferred: deferred[idx],
                rank: pos + 1,
            })
        })
        .collect()
}

/// Split already-flattened entries into study groups.
pub fn partition_entries(entries: Vec<AssociationEntry>, defer: &DeferSet) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut by_letter: HashMap<char, usize> = HashMap::new();
    let mut deferred_entries = Vec::new();

    for ranked in rank_entries(entries, defer) {
        if ranked.deferred {
            deferred_entries.push(ranked.entry);
            continue;
        }
        let Some(first) = ranked.entry.first_char() else { continue };
        let slot = *by_letter.entry(first).or_insert_with(|| {
            groups.push(Group { name: GroupName::Letter(first), entries: Vec::new() });
            groups.len() - 1
        });
        groups[slot].entries.push(ranked.entry);
    }

    if !deferred_entries.is_empty() {
        groups.push(Group { name: GroupName::Deferred, entries: deferred_entries });
    }

    debug!(groups = groups.len(), "Partitioned entries into study groups");
    groups
}

/// Full pipeline: flatten, filter, rank and group.
pub fn partition<S: TabularSource + ?Sized>(source: &S, options: &PartitionOptions) -> Vec<Group> {
    partition_entries(flatten(source, &options.empty_marker), &options.defer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drill_engine::table::RawTable;

    fn table() -> RawTable {
        RawTable::new(vec!["A".into(), "B".into(), "C".into(), "D".into()])
            .with_row("B", &["bat", ".", "bic", "bed"])
            .with_row("C", &["cab", "cub", "", "cod"])
            .with_row("D", &["dam", "dab", "duck", "."])
    }

    fn labels(groups: &[Group]) -> Vec<String> {
        groups.iter().map(|g| g.name.label()).collect()
    }

    fn keys(group: &Group) -> Vec<&str> {
        group.keys().collect()
    }

    #[test]
    fn flatten_drops_blank_and_marker_cells() {
        let entries = flatten(&table(), ".");
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["BA", "BC", "BD", "CA", "CB", "CD", "DA", "DB", "DC"]);
    }

    #[test]
    fn flatten_drops_malformed_keys() {
        let t = RawTable::new(vec!["AB".into(), "C".into()]).with_row("D", &["long", "dc"]);
        let entries = flatten(&t, ".");
        assert_eq!(entries, vec![AssociationEntry::new("DC", "dc")]);
    }

    #[test]
    fn deferred_keys_form_one_trailing_group() {
        let groups = partition(&table(), &PartitionOptions::default());
        assert_eq!(labels(&groups), ["B", "C", "D", "Z"]);
        assert_eq!(keys(&groups[0]), ["BC", "BD"]);
        assert_eq!(keys(&groups[1]), ["CB", "CD"]);
        assert_eq!(keys(&groups[2]), ["DB", "DC"]);
        assert_eq!(keys(&groups[3]), ["BA", "CA", "DA"]);
    }

    #[test]
    fn empty_defer_set_keeps_only_letter_groups() {
        let options = PartitionOptions { defer: DeferSet::empty(), ..PartitionOptions::default() };
        let groups = partition(&table(), &options);
        assert_eq!(labels(&groups), ["B", "C", "D"]);
        assert_eq!(keys(&groups[0]), ["BA", "BC", "BD"]);
    }

    #[test]
    fn defer_set_ignores_case() {
        let defer = DeferSet::new("a e");
        assert!(defer.is_deferred("BA"));
        assert!(defer.is_deferred("eb"));
        assert!(!defer.is_deferred("BC"));
    }

    #[test]
    fn ranks_are_dense_and_primary_first() {
        let entries = flatten(&table(), ".");
        let ranked = rank_entries(entries, &DeferSet::default());
        let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, (1..=ranked.len()).collect::<Vec<_>>());
        let first_deferred = ranked.iter().position(|r| r.deferred).unwrap();
        assert!(ranked[first_deferred..].iter().all(|r| r.deferred));
    }

    #[test]
    fn deferred_block_holds_for_large_tables() {
        // More than DEFER_RANK_FACTOR primaries sorting after a deferred key.
        let mut entries = vec![AssociationEntry::new("BA", "deferred")];
        for a in 'F'..='P' {
            for b in 'F'..='P' {
                entries.push(AssociationEntry::new(format!("{a}{b}"), "x"));
            }
        }
        assert!(entries.len() > DEFER_RANK_FACTOR as usize);
        let ranked = rank_entries(entries, &DeferSet::default());
        assert!(ranked.last().unwrap().deferred);
        assert_eq!(ranked.iter().filter(|r| r.deferred).count(), 1);
    }

    #[test]
    fn duplicate_keys_keep_table_order() {
        let entries = vec![
            AssociationEntry::new("CD", "first"),
            AssociationEntry::new("BC", "other"),
            AssociationEntry::new("CD", "second"),
        ];
        let groups = partition_entries(entries, &DeferSet::default());
        let refs: Vec<&str> = groups[1].entries.iter().map(|e| e.reference.as_str()).collect();
        assert_eq!(refs, ["first", "second"]);
    }

    #[test]
    fn empty_table_yields_no_groups() {
        let t = RawTable::new(vec!["A".into()]).with_row("B", &["."]);
        assert!(partition(&t, &PartitionOptions::default()).is_empty());
    }
}
