//! Flat append logs of drill rounds.
//!
//! Each session writes one CSV file: a header row, then one row per scored
//! round. [`CsvSessionLog`] flushes after every row so the file is complete
//! whichever way the session ends.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::drill_engine::{
    error::Result,
    models::{DrillRecord, EdgeRecord},
};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A record that can be written as one CSV row.
pub trait LogRow {
    fn header() -> &'static [&'static str];
    fn fields(&self) -> Vec<String>;
}

fn stamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

impl LogRow for DrillRecord {
    fn header() -> &'static [&'static str] {
        &["Timestamp", "Letter Pair", "Correct Image", "User Input", "Is Correct", "Response Time (s)"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            stamp(&self.timestamp),
            self.key.clone(),
            self.reference.clone(),
            self.user_input.clone(),
            if self.correct { "True" } else { "False" }.to_string(),
            format!("{:.3}", self.elapsed_seconds),
        ]
    }
}

impl LogRow for EdgeRecord {
    fn header() -> &'static [&'static str] {
        &["Timestamp", "Edge", "Reference", "User Input", "Response Time (s)"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            stamp(&self.timestamp),
            self.edge.clone(),
            self.reference.clone(),
            self.user_input.clone(),
            format!("{:.3}", self.elapsed_seconds),
        ]
    }
}

/// Append target for round records.
pub trait SessionLogger<R> {
    fn append(&mut self, record: &R) -> Result<()>;

    /// Flush anything pending. Called once when the session ends.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Discards everything; used when logging is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl<R> SessionLogger<R> for NullLog {
    fn append(&mut self, _record: &R) -> Result<()> {
        Ok(())
    }
}

/// Keeps records in memory.
#[derive(Debug, Clone)]
pub struct RecordingLog<R> {
    pub records: Vec<R>,
}

impl<R> Default for RecordingLog<R> {
    fn default() -> Self {
        RecordingLog { records: Vec::new() }
    }
}

impl<R: Clone> SessionLogger<R> for RecordingLog<R> {
    fn append(&mut self, record: &R) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// CSV writer over any byte sink, header written on creation.
pub struct CsvSessionLog<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSessionLog<W> {
    pub fn from_writer<R: LogRow>(inner: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(R::header())?;
        writer.flush()?;
        Ok(CsvSessionLog { writer })
    }

    /// Flush and hand back the underlying sink.
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error().into())
    }
}

impl CsvSessionLog<File> {
    /// Create `path` (truncating) and write the header for `R`.
    pub fn create<R: LogRow>(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        let log = Self::from_writer::<R>(file)?;
        info!(path = %path.display(), "Session log opened");
        Ok(log)
    }
}

impl<R: LogRow, W: Write> SessionLogger<R> for CsvSessionLog<W> {
    fn append(&mut self, record: &R) -> Result<()> {
        self.writer.write_record(record.fields())?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Which drill a log file belongs to; decides the file name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    LetterPairs,
    Edges,
}

impl LogKind {
    fn prefix(self) -> &'static str {
        match self {
            LogKind::LetterPairs => "bld_pairs_session",
            LogKind::Edges       => "edges_rec_session",
        }
    }
}

/// `<dir>/<prefix>_<YYYYmmdd_HHMMSS>.csv`, creating `dir` if needed.
pub fn session_log_path(dir: &Path, kind: LogKind) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let stamp = Local::now().format(FILE_STAMP_FORMAT);
    Ok(dir.join(format!("{}_{}.csv", kind.prefix(), stamp)))
}

/// Open a fresh CSV log under `dir`, or fall back to [`NullLog`] when the
/// directory or file cannot be created. Returns the path actually written to.
pub fn open_session_log<R: LogRow + 'static>(
    dir: &Path,
    kind: LogKind,
) -> (Box<dyn SessionLogger<R>>, Option<PathBuf>) {
    let opened = session_log_path(dir, kind)
        .and_then(|path| CsvSessionLog::create::<R>(&path).map(|log| (log, path)));
    match opened {
        Ok((log, path)) => (Box::new(log), Some(path)),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Session log unavailable, continuing without it");
            (Box::new(NullLog), None)
        }
    }
}
