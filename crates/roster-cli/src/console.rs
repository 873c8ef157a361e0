//! Line-oriented terminal I/O.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Prompts and messages over a reader plus two writers.
///
/// The binary wraps stdin/stdout/stderr; tests drive it with in-memory
/// buffers.
pub struct Console<R, W, E> {
    input: R,
    output: W,
    errors: E,
}

impl<R: BufRead, W: Write, E: Write> Console<R, W, E> {
    pub fn new(input: R, output: W, errors: E) -> Self {
        Self {
            input,
            output,
            errors,
        }
    }

    /// Print one line.
    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Print one line on the error stream.
    pub fn complain(&mut self, line: impl Display) -> io::Result<()> {
        self.output.flush()?;
        writeln!(self.errors, "{line}")
    }

    /// Print `label` without a newline and read one line of input.
    ///
    /// Returns `None` at end of input. The line terminator is stripped.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (W, E) {
        (self.output, self.errors)
    }
}
