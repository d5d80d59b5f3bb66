//! Adaptive letter-pair drill.
//!
//! ## State machine
//!
//! ```text
//!            correct, streak < threshold
//!            incorrect (streak := 0)
//!              ┌──────┐
//!              ▼      │
//!  new ──▶  Active ───┘ ──(active set empty)──▶ AllMastered
//!              │
//!              └──(answer == "quit")──▶ Aborted
//! ```
//!
//! Every round draws a key uniformly from the unmastered set, regardless of
//! its streak. A miss wipes the streak. A key is retired the moment its
//! streak reaches the threshold and is never asked again in this session.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::drill_engine::{
    comparator::{equivalent, is_cancel},
    console::Console,
    error::{DrillError, Result},
    log::SessionLogger,
    models::{AssociationEntry, DrillRecord, DrillStatus, MasteryCounter, RoundReport, SessionOutcome},
    picker::Picker,
};

/// One learner's drill over a fixed set of letter pairs.
pub struct DrillSession<P> {
    references: BTreeMap<String, String>,
    /// Unmastered keys in key order; removal keeps the order of the rest.
    active: Vec<String>,
    counters: BTreeMap<String, MasteryCounter>,
    threshold: u32,
    picker: P,
    status: DrillStatus,
    rounds: u32,
    correct: u32,
    log_failures: u32,
}

impl<P: Picker> DrillSession<P> {
    /// Start a session. Later duplicates of a key replace earlier ones.
    ///
    /// # Errors
    /// `DrillError::InvalidThreshold` when `threshold` is 0.
    pub fn new<I>(entries: I, threshold: u32, picker: P) -> Result<Self>
    where
        I: IntoIterator<Item = AssociationEntry>,
    {
        if threshold == 0 {
            return Err(DrillError::InvalidThreshold(threshold));
        }

        let references: BTreeMap<String, String> = entries
            .into_iter()
            .map(|e| (e.key, e.reference))
            .collect();
        let active: Vec<String> = references.keys().cloned().collect();
        let counters = active
            .iter()
            .map(|k| (k.clone(), MasteryCounter::default()))
            .collect();
        let status = if active.is_empty() { DrillStatus::AllMastered } else { DrillStatus::Active };

        info!(keys = active.len(), threshold, "Drill session started");

        Ok(DrillSession {
            references,
            active,
            counters,
            threshold,
            picker,
            status,
            rounds: 0,
            correct: 0,
            log_failures: 0,
        })
    }

    pub fn status(&self) -> DrillStatus {
        self.status
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn active_keys(&self) -> &[String] {
        &self.active
    }

    pub fn counter(&self, key: &str) -> Option<MasteryCounter> {
        self.counters.get(key).copied()
    }

    pub fn reference(&self, key: &str) -> Option<&str> {
        self.references.get(key).map(String::as_str)
    }

    /// Number of distinct keys in the session.
    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn mastered_count(&self) -> usize {
        self.references.len() - self.active.len()
    }

    pub fn outcome(&self) -> SessionOutcome {
        SessionOutcome {
            status: self.status,
            rounds: self.rounds,
            correct: self.correct,
            mastered: self.mastered_count(),
            log_failures: self.log_failures,
        }
    }

    /// Draw the next key to ask, or `None` once the session has ended.
    pub fn pick_key(&mut self) -> Option<String> {
        if self.status != DrillStatus::Active {
            return None;
        }
        let len = self.active.len();
        if len == 0 {
            return None;
        }
        let idx = self.picker.pick(len) % len;
        self.active.get(idx).cloned()
    }

    /// Score `answer` for `key` and update its streak.
    ///
    /// Returns `None` without touching any state when the session is over or
    /// `key` is not in the active set.
    pub fn apply_answer(&mut self, key: &str, answer: &str, elapsed_seconds: f64) -> Option<RoundReport> {
        if self.status != DrillStatus::Active {
            return None;
        }
        let pos = self.active.iter().position(|k| k == key)?;
        let reference = self.references.get(key)?.clone();
        let counter = self.counters.entry(key.to_string()).or_default();

        let correct = equivalent(&reference, answer);
        let mut mastered = false;
        if correct {
            counter.streak += 1;
            if counter.streak >= self.threshold {
                self.active.remove(pos);
                mastered = true;
            }
        } else {
            counter.streak = 0;
        }
        let streak = counter.streak;

        self.rounds += 1;
        if correct {
            self.correct += 1;
        }
        if self.active.is_empty() {
            self.status = DrillStatus::AllMastered;
        }

        debug!(key, correct, streak, mastered, "Round scored");

        Some(RoundReport {
            key: key.to_string(),
            reference,
            answer: answer.to_string(),
            correct,
            streak,
            mastered,
            elapsed_seconds,
        })
    }

    /// Stop the session; a no-op once it has already ended.
    pub fn cancel(&mut self) {
        if self.status == DrillStatus::Active {
            self.status = DrillStatus::Aborted;
        }
    }

    /// Play one round: pick, prompt, score, log.
    ///
    /// # Errors
    /// Only console I/O errors. Logger failures are counted and reported via
    /// `tracing`, never returned.
    pub fn step<C, L>(&mut self, console: &mut C, log: &mut L) -> Result<DrillStatus>
    where
        C: Console,
        L: SessionLogger<DrillRecord> + ?Sized,
    {
        let Some(key) = self.pick_key() else {
            return Ok(self.status);
        };

        let started = Instant::now();
        let answer = console.prompt(&format!("\nLetter pair: {key}\nYour answer: "))?;
        let elapsed = started.elapsed().as_secs_f64();
        let timestamp = Local::now().naive_local();

        if is_cancel(&answer) {
            self.cancel();
            return Ok(self.status);
        }

        let Some(report) = self.apply_answer(&key, &answer, elapsed) else {
            return Ok(self.status);
        };

        if report.correct {
            console.say(&format!("Correct! (t: {elapsed:.1}s)"));
            if report.mastered {
                console.say(&format!("You've mastered '{key}'!"));
            }
        } else {
            console.say(&format!(
                "Incorrect. The correct answer is: {} (t: {elapsed:.1}s)",
                report.reference
            ));
        }

        let record = DrillRecord {
            timestamp,
            key: report.key,
            reference: report.reference,
            user_input: report.answer,
            correct: report.correct,
            elapsed_seconds: elapsed,
        };
        if let Err(e) = log.append(&record) {
            self.log_failures += 1;
            warn!(error = %e, key = %record.key, "Failed to append drill record");
        }

        Ok(self.status)
    }

    /// Play rounds until every key is mastered or the learner quits.
    pub fn run<C, L>(&mut self, console: &mut C, log: &mut L) -> Result<SessionOutcome>
    where
        C: Console,
        L: SessionLogger<DrillRecord> + ?Sized,
    {
        while !self.step(console, log)?.is_terminal() {}

        if let Err(e) = log.finish() {
            self.log_failures += 1;
            warn!(error = %e, "Failed to flush drill log");
        }
        if self.status == DrillStatus::AllMastered {
            console.say("All letter pairs mastered!");
        }

        let outcome = self.outcome();
        info!(
            status = %outcome.status,
            rounds = outcome.rounds,
            correct = outcome.correct,
            mastered = outcome.mastered,
            "Drill session ended"
        );
        Ok(outcome)
    }
}
