//! # bld_pair_drill
//!
//! An offline drill tool for blindfolded-cubing letter-pair mnemonics.
//!
//! A letter-pair table maps every two-letter key (`"BD"`, `"KM"`, ...) to the
//! image a solver memorises for it. This library turns such a table into
//! study groups and drills the learner on them until each pair has been
//! recalled correctly several times in a row.
//!
//! ## How it works
//!
//! 1. Load a [`RawTable`] (row letters × column letters) and call
//!    [`partition`] — blank cells and the `"."` marker are dropped, pairs
//!    touching the defer set (`A E R` by default) are set aside for last,
//!    and the rest are grouped by first letter.
//! 2. Pick one or more groups and start a [`DrillSession`] with a mastery
//!    threshold and a [`Picker`].
//! 3. [`DrillSession::run`] asks a random unmastered pair each round. A
//!    correct answer extends the pair's streak; a miss resets it to zero;
//!    reaching the threshold retires the pair. Each scored round is appended
//!    to a [`SessionLogger`].
//!
//! Answers are compared as *sets of characters* ([`equivalent`]): case,
//! whitespace, order and repeats are ignored.
//!
//! [`EdgeQuiz`] is the simpler edge-recognition sibling: random edges with
//! replacement, exact letter match, a running tally, no retirement.
//!
//! ## Quick start
//!
//! ```rust
//! use bld_pair_drill::{
//!     partition, DrillSession, DrillStatus, PartitionOptions, RawTable, RecordingLog,
//!     RoundRobin, ScriptedConsole,
//! };
//!
//! let table = RawTable::new(vec!["B".into(), "C".into()])
//!     .with_row("B", &[".", "bic"])
//!     .with_row("C", &["cub", "."]);
//! let groups = partition(&table, &PartitionOptions::default());
//! assert_eq!(groups.len(), 2);
//!
//! let entries = groups.into_iter().flat_map(|g| g.entries);
//! let mut session = DrillSession::new(entries, 1, RoundRobin::new()).unwrap();
//! let mut console = ScriptedConsole::new(["bic", "cub"]);
//! let mut log = RecordingLog::default();
//!
//! let outcome = session.run(&mut console, &mut log).unwrap();
//! assert_eq!(outcome.status, DrillStatus::AllMastered);
//! assert_eq!(log.records.len(), 2);
//! ```

pub mod drill_engine;

// Convenience re-exports so callers can use `bld_pair_drill::partition`
// directly without reaching into `drill_engine::`.
pub use drill_engine::{
    equivalent, partition, same_token, AssociationEntry, Console, CsvSessionLog, DeferSet,
    DrillConfig, DrillError, DrillRecord, DrillSession, DrillStatus, EdgeQuiz, EdgeRecord,
    EdgeScheme, EdgeTally, Group, GroupName, NullLog, PartitionOptions, Picker, RawTable,
    RecordingLog, RngPicker, RoundRobin, ScriptedConsole, SessionLogger, SessionOutcome,
    StdConsole, TabularSource,
};
