//! Property-based tests for partitioning, answer checking and mastery.
//!
//! Random letter-pair sheets and answer sequences; each property must hold
//! for every generated input.

use proptest::prelude::*;

use bld_pair_drill::drill_engine::partition::{flatten, DeferSet};
use bld_pair_drill::{
    equivalent, partition, AssociationEntry, DrillSession, GroupName, PartitionOptions, RawTable,
    RngPicker,
};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWX";

/// A square sheet over a random subset of letters with random blanks/markers.
fn arb_sheet() -> impl Strategy<Value = RawTable> {
    proptest::sample::subsequence(LETTERS.chars().collect::<Vec<_>>(), 1..10).prop_flat_map(|letters| {
        let n = letters.len();
        proptest::collection::vec(prop_oneof![Just(String::new()), Just(".".to_string()), "[a-z]{1,8}"], n * n)
            .prop_map(move |cells| {
                let cols: Vec<String> = letters.iter().map(|c| c.to_string()).collect();
                let mut table = RawTable::new(cols.clone());
                for (i, row) in cols.iter().enumerate() {
                    let values = cells[i * n..(i + 1) * n]
                        .iter()
                        .map(|v| if v.is_empty() { None } else { Some(v.clone()) })
                        .collect();
                    table.push_row(row.clone(), values);
                }
                table
            })
    })
}

// ---------------------------------------------------------------------------
// Property: partitioning is a deterministic exact partition
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn partition_is_deterministic(sheet in arb_sheet()) {
        let options = PartitionOptions::default();
        prop_assert_eq!(partition(&sheet, &options), partition(&sheet, &options));
    }

    #[test]
    fn partition_covers_each_entry_once(sheet in arb_sheet()) {
        let options = PartitionOptions::default();
        let mut expected: Vec<AssociationEntry> = flatten(&sheet, ".");
        let mut got: Vec<AssociationEntry> = partition(&sheet, &options)
            .into_iter()
            .flat_map(|g| g.entries)
            .collect();
        expected.sort_by(|a, b| a.key.cmp(&b.key));
        got.sort_by(|a, b| a.key.cmp(&b.key));
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn deferred_entries_only_in_deferred_group(sheet in arb_sheet()) {
        let defer = DeferSet::default();
        let groups = partition(&sheet, &PartitionOptions::default());
        let deferred_groups = groups.iter().filter(|g| g.name == GroupName::Deferred).count();
        prop_assert!(deferred_groups <= 1);
        for group in &groups {
            for entry in &group.entries {
                match group.name {
                    GroupName::Deferred => {
                        prop_assert!(defer.is_deferred(&entry.key));
                    }
                    GroupName::Letter(c) => {
                        prop_assert!(!defer.is_deferred(&entry.key));
                        prop_assert_eq!(entry.first_char(), Some(c));
                    }
                }
            }
            let keys: Vec<&str> = group.keys().collect();
            let mut sorted = keys.clone();
            sorted.sort_unstable();
            prop_assert_eq!(keys, sorted);
        }
        if let Some(pos) = groups.iter().position(|g| g.name == GroupName::Deferred) {
            prop_assert_eq!(pos, groups.len() - 1);
        }
    }
}

// ---------------------------------------------------------------------------
// Property: the comparator is a symmetric, order-free equivalence
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn comparator_is_symmetric(a in "[a-zA-Z ]{0,12}", b in "[a-zA-Z ]{0,12}") {
        prop_assert_eq!(equivalent(&a, &b), equivalent(&b, &a));
    }

    #[test]
    fn comparator_ignores_order_case_and_spaces(s in "[a-z]{1,12}") {
        let reversed: String = s.chars().rev().collect();
        let spaced: String = s.to_uppercase().chars().flat_map(|c| [c, ' ']).collect();
        prop_assert!(equivalent(&s, &reversed));
        prop_assert!(equivalent(&s, &spaced));
    }

    #[test]
    fn comparator_detects_new_characters(s in "[a-m]{1,12}", extra in "[n-z]") {
        let extended = format!("{s}{extra}");
        prop_assert!(!equivalent(&s, &extended));
    }
}

// ---------------------------------------------------------------------------
// Property: streaks follow consecutive hits and retire at the threshold
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn streak_tracks_consecutive_hits(hits in proptest::collection::vec(any::<bool>(), 1..40), threshold in 1u32..5) {
        let mut session = DrillSession::new(
            vec![AssociationEntry::new("KM", "kim")],
            threshold,
            RngPicker::seeded(0),
        )
        .unwrap();

        let mut expected = 0u32;
        for hit in hits {
            let answer = if hit { "mik" } else { "kit" };
            match session.apply_answer("KM", answer, 0.0) {
                Some(report) => {
                    expected = if hit { expected + 1 } else { 0 };
                    prop_assert_eq!(report.streak, expected);
                    prop_assert_eq!(report.mastered, expected == threshold);
                    if report.mastered {
                        prop_assert!(session.active_keys().is_empty());
                    }
                }
                None => {
                    // Retired: nothing changes any more.
                    prop_assert_eq!(expected, threshold);
                    prop_assert_eq!(session.counter("KM").unwrap().streak, threshold);
                }
            }
        }
    }
}

