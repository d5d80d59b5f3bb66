use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Association data
// ---------------------------------------------------------------------------

/// One letter pair and the image/word it is memorised as.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssociationEntry {
    /// Two-character identifier, e.g. `"BD"`.
    pub key: String,
    /// Non-empty reference answer, e.g. `"bird"`.
    pub reference: String,
}

impl AssociationEntry {
    pub fn new(key: impl Into<String>, reference: impl Into<String>) -> Self {
        AssociationEntry { key: key.into(), reference: reference.into() }
    }

    /// First character of the key; `None` only for an empty key.
    pub fn first_char(&self) -> Option<char> {
        self.key.chars().next()
    }
}

impl fmt::Display for AssociationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.key, self.reference)
    }
}

/// Reserved label of the group that collects every deferred entry.
pub const DEFERRED_LABEL: &str = "Z";

/// Name of a study group.
///
/// Primary groups are named after the shared first character of their keys.
/// Deferred entries all land in one group with the reserved label `Z`, which
/// no letter scheme assigns to a sticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupName {
    Letter(char),
    Deferred,
}

impl GroupName {
    /// Resolve a user-typed or file-derived label, case-insensitively.
    pub fn parse(label: &str) -> Option<GroupName> {
        let label = label.trim();
        if label.eq_ignore_ascii_case(DEFERRED_LABEL) {
            return Some(GroupName::Deferred);
        }
        let mut chars = label.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(GroupName::Letter(c.to_ascii_uppercase())),
            _ => None,
        }
    }

    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupName::Letter(c) => write!(f, "{}", c),
            GroupName::Deferred  => write!(f, "{}", DEFERRED_LABEL),
        }
    }
}

/// An ordered, immutable batch of entries drilled together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: GroupName,
    pub entries: Vec<AssociationEntry>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }
}

// ---------------------------------------------------------------------------
// Drill state
// ---------------------------------------------------------------------------

/// Consecutive correct answers for one key since the last miss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryCounter {
    pub streak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrillStatus {
    /// At least one key is still unmastered.
    Active,
    /// Every key reached the threshold.
    AllMastered,
    /// The learner typed the cancel sentinel.
    Aborted,
}

impl DrillStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, DrillStatus::Active)
    }
}

impl fmt::Display for DrillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrillStatus::Active      => write!(f, "active"),
            DrillStatus::AllMastered => write!(f, "all mastered"),
            DrillStatus::Aborted     => write!(f, "aborted"),
        }
    }
}

/// Result of scoring one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub key: String,
    pub reference: String,
    pub answer: String,
    pub correct: bool,
    /// Streak after this round.
    pub streak: u32,
    /// True when this round retired the key.
    pub mastered: bool,
    pub elapsed_seconds: f64,
}

/// Summary handed back when a drill run reaches a terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub status: DrillStatus,
    /// Scored rounds; the quit round is not counted.
    pub rounds: u32,
    pub correct: u32,
    pub mastered: usize,
    /// Records the logger failed to append.
    pub log_failures: u32,
}

/// Running score of the edge quiz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeTally {
    pub correct: u32,
    pub incorrect: u32,
}

impl EdgeTally {
    pub fn total(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// `correct / total`, or `None` before the first scored round.
    pub fn accuracy(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            n => Some(self.correct as f64 / n as f64),
        }
    }

    pub(crate) fn record(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Log records
// ---------------------------------------------------------------------------

/// One scored round of a letter-pair drill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillRecord {
    pub timestamp: NaiveDateTime,
    pub key: String,
    pub reference: String,
    pub user_input: String,
    pub correct: bool,
    pub elapsed_seconds: f64,
}

/// One scored round of the edge quiz. Correctness is recomputable from
/// `reference` and `user_input`, so it is not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub timestamp: NaiveDateTime,
    pub edge: String,
    pub reference: String,
    pub user_input: String,
    pub elapsed_seconds: f64,
}
