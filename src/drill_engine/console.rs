//! Prompt/answer I/O seen by the drill loops.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::drill_engine::comparator::CANCEL_SENTINEL;

/// Synchronous learner I/O. `prompt` blocks until an answer is available.
pub trait Console {
    fn prompt(&mut self, text: &str) -> io::Result<String>;
    fn say(&mut self, text: &str);
}

/// Terminal console over any buffered reader and writer.
///
/// End of input is reported as the cancel sentinel so a closed stdin ends the
/// session cleanly instead of spinning.
pub struct StdConsole<R, W> {
    input: R,
    output: W,
}

impl StdConsole<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        StdConsole { input: io::stdin().lock(), output: io::stdout() }
    }
}

impl<R: BufRead, W: Write> StdConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        StdConsole { input, output }
    }
}

impl<R: BufRead, W: Write> Console for StdConsole<R, W> {
    fn prompt(&mut self, text: &str) -> io::Result<String> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(CANCEL_SENTINEL.to_string());
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{text}") {
            debug!(error = %e, "Console write failed");
        }
    }
}

/// Replays a fixed list of answers and records everything shown.
///
/// Once the script runs out every prompt answers the cancel sentinel.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub said: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedConsole {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
            said: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn prompt(&mut self, text: &str) -> io::Result<String> {
        self.prompts.push(text.to_string());
        Ok(self.answers.pop_front().unwrap_or_else(|| CANCEL_SENTINEL.to_string()))
    }

    fn say(&mut self, text: &str) {
        self.said.push(text.to_string());
    }
}
