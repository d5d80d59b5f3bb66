//! Edge-recognition quiz.
//!
//! A simpler sibling of the letter-pair drill: every round draws an edge
//! sticker with replacement, asks for its memo letter, and keeps a running
//! tally. Nothing is ever retired; the quiz only ends when the learner quits.

use std::time::Instant;

use chrono::Local;
use tracing::{info, warn};

use crate::drill_engine::{
    comparator::{is_cancel, same_token},
    console::Console,
    error::{DrillError, Result},
    log::SessionLogger,
    models::{EdgeRecord, EdgeTally},
    picker::Picker,
};

/// Edge stickers and the letters they are memorised as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeScheme {
    edges: Vec<(String, String)>,
}

impl EdgeScheme {
    /// Speffz lettering: stickers named by their face then the adjacent face.
    pub fn speffz() -> Self {
        const STICKERS: [(&str, &str); 24] = [
            ("UB", "A"), ("UR", "B"), ("UF", "C"), ("UL", "D"),
            ("LU", "E"), ("LF", "F"), ("LD", "G"), ("LB", "H"),
            ("FU", "I"), ("FR", "J"), ("FD", "K"), ("FL", "L"),
            ("RU", "M"), ("RB", "N"), ("RD", "O"), ("RF", "P"),
            ("BU", "Q"), ("BL", "R"), ("BD", "S"), ("BR", "T"),
            ("DF", "U"), ("DR", "V"), ("DB", "W"), ("DL", "X"),
        ];
        Self::from_pairs(STICKERS)
    }

    pub fn from_pairs<I, E, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (E, L)>,
        E: Into<String>,
        L: Into<String>,
    {
        EdgeScheme {
            edges: pairs.into_iter().map(|(e, l)| (e.into(), l.into())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Memo letter of `edge`, matched case-insensitively.
    pub fn reference(&self, edge: &str) -> Option<&str> {
        self.edges
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(edge))
            .map(|(_, l)| l.as_str())
    }
}

/// What one call to [`EdgeQuiz::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    Scored { correct: bool },
    Cancelled,
}

pub struct EdgeQuiz<P> {
    scheme: EdgeScheme,
    picker: P,
    tally: EdgeTally,
    log_failures: u32,
}

impl<P: Picker> EdgeQuiz<P> {
    /// # Errors
    /// `DrillError::EmptyScheme` when there is nothing to ask.
    pub fn new(scheme: EdgeScheme, picker: P) -> Result<Self> {
        if scheme.is_empty() {
            return Err(DrillError::EmptyScheme);
        }
        Ok(EdgeQuiz { scheme, picker, tally: EdgeTally::default(), log_failures: 0 })
    }

    pub fn tally(&self) -> EdgeTally {
        self.tally
    }

    pub fn log_failures(&self) -> u32 {
        self.log_failures
    }

    /// Draw an edge with replacement.
    pub fn pick_edge(&mut self) -> (&str, &str) {
        let len = self.scheme.len();
        let idx = self.picker.pick(len) % len;
        let (edge, letter) = &self.scheme.edges[idx];
        (edge.as_str(), letter.as_str())
    }

    pub fn step<C, L>(&mut self, console: &mut C, log: &mut L) -> Result<QuizStep>
    where
        C: Console,
        L: SessionLogger<EdgeRecord> + ?Sized,
    {
        let (edge, reference) = {
            let (e, r) = self.pick_edge();
            (e.to_string(), r.to_string())
        };

        let started = Instant::now();
        let input = console.prompt(&format!("\nEdge: {edge}\nWhich edge is this? "))?.to_lowercase();
        let elapsed = started.elapsed().as_secs_f64();
        let timestamp = Local::now().naive_local();

        if is_cancel(&input) {
            return Ok(QuizStep::Cancelled);
        }

        let correct = same_token(&reference, &input);
        self.tally.record(correct);
        if correct {
            console.say(&format!("Correct! (t: {elapsed:.1})"));
        } else {
            console.say(&format!("Incorrect! It was {reference} (t: {elapsed:.1})"));
        }

        let record = EdgeRecord { timestamp, edge, reference, user_input: input, elapsed_seconds: elapsed };
        if let Err(e) = log.append(&record) {
            self.log_failures += 1;
            warn!(error = %e, edge = %record.edge, "Failed to append edge record");
        }

        Ok(QuizStep::Scored { correct })
    }

    /// Ask edges until the learner quits, then print and return the tally.
    pub fn run<C, L>(&mut self, console: &mut C, log: &mut L) -> Result<EdgeTally>
    where
        C: Console,
        L: SessionLogger<EdgeRecord> + ?Sized,
    {
        while self.step(console, log)? != QuizStep::Cancelled {}

        if let Err(e) = log.finish() {
            self.log_failures += 1;
            warn!(error = %e, "Failed to flush edge log");
        }

        let tally = self.tally;
        console.say("Exiting the program.");
        console.say(&format!("*** Session Stats ***\nCorrect: {}/{}", tally.correct, tally.total()));
        info!(correct = tally.correct, incorrect = tally.incorrect, "Edge quiz ended");
        Ok(tally)
    }
}
