//! Core drill engine — group partitioning, answer checking, and the drill loops.
//!
//! ## Module overview
//!
//! | Module       | Purpose |
//! |--------------|---------|
//! | `models`     | Shared types: entries, groups, counters, round reports, log records |
//! | `table`      | Raw association tables and the CSV matrix loader |
//! | `partition`  | Deterministic ranking of entries into letter and deferred groups |
//! | `comparator` | Set-of-characters answer check, token check, cancel sentinel |
//! | `picker`     | Seedable uniform selection and a round-robin picker |
//! | `session`    | Adaptive letter-pair drill with reset-on-miss mastery tracking |
//! | `edge_quiz`  | Single-pass edge-recognition quiz with a running tally |
//! | `console`    | Prompt/answer I/O: terminal and scripted |
//! | `log`        | Flat CSV append logs of scored rounds |
//! | `groups`     | Group files on disk and interactive group selection |
//! | `config`     | TOML configuration |
//! | `error`      | `DrillError` and the `Result` alias |

pub mod comparator;
pub mod config;
pub mod console;
pub mod edge_quiz;
pub mod error;
pub mod groups;
pub mod log;
pub mod models;
pub mod partition;
pub mod picker;
pub mod session;
pub mod table;

// Re-export the public API surface so callers can use
// `drill_engine::partition` without reaching into sub-modules.
pub use comparator::{equivalent, is_cancel, same_token, CANCEL_SENTINEL};
pub use config::{DrillConfig, PartitionConfig};
pub use console::{Console, ScriptedConsole, StdConsole};
pub use edge_quiz::{EdgeQuiz, EdgeScheme, QuizStep};
pub use error::{DrillError, Result};
pub use log::{
    open_session_log, CsvSessionLog, LogKind, LogRow, NullLog, RecordingLog, SessionLogger,
};
pub use models::{
    AssociationEntry, DrillRecord, DrillStatus, EdgeRecord, EdgeTally, Group, GroupName,
    MasteryCounter, RoundReport, SessionOutcome,
};
pub use partition::{partition, partition_entries, DeferSet, PartitionOptions};
pub use picker::{Picker, RngPicker, RoundRobin};
pub use session::DrillSession;
pub use table::{Cell, RawTable, TabularSource};
