//! Interactive prompt boundary for the `interactive` resolver.
//!
//! The pipeline treats the prompt as a synchronous external collaborator:
//! it hands over the candidate set and receives a [`Decision`] back. Tests
//! substitute scripted implementations of [`Prompt`]; the production
//! implementation is [`TerminalPrompt`], a line-oriented stdin/stderr UI.

use std::io::{self, BufRead, Write};

use bytesize::ByteSize;
use chrono::{DateTime, Local};

use crate::scanner::FileRecord;

/// A human decision about one duplicate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Keep the candidate at this 0-based index as the original.
    Keep(usize),
    /// Leave the group for the next resolver (or unresolved).
    Skip,
    /// Abort the whole run.
    Cancel,
}

/// External collaborator that picks an original from a candidate set.
///
/// Implementations must return `Keep` indices within `0..group.len()`.
pub trait Prompt {
    /// Present the candidates and return the user's decision.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the interaction channel fails.
    fn choose(&mut self, group: &[FileRecord]) -> io::Result<Decision>;
}

/// Line-oriented terminal prompt reading from stdin.
///
/// Lists the candidates with 1-based indices, sizes and modification times,
/// then accepts a number to keep, `s` to skip the group, or `e` to exit the
/// run. Invalid input re-prompts.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    /// Create a terminal prompt.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn parse_line(line: &str, len: usize) -> Option<Decision> {
        let line = line.trim();
        match line {
            "s" | "S" => Some(Decision::Skip),
            "e" | "E" => Some(Decision::Cancel),
            _ => match line.parse::<usize>() {
                Ok(n) if (1..=len).contains(&n) => Some(Decision::Keep(n - 1)),
                _ => None,
            },
        }
    }
}

impl Prompt for TerminalPrompt {
    fn choose(&mut self, group: &[FileRecord]) -> io::Result<Decision> {
        let stderr = io::stderr();
        let mut out = stderr.lock();

        writeln!(out, "\nDuplicate group ({} identical files):", group.len())?;
        for (i, record) in group.iter().enumerate() {
            let modified: DateTime<Local> = record.modified.into();
            writeln!(
                out,
                "{:>3}  {}  {}  {}",
                i + 1,
                ByteSize::b(record.size),
                modified.format("%Y-%m-%d %H:%M:%S"),
                record.path.display()
            )?;
        }

        let stdin = io::stdin();
        let mut input = stdin.lock();
        loop {
            write!(
                out,
                "Enter a file number to keep as original, 's' to skip this group, \
                 or 'e' to exit: "
            )?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // EOF on stdin; nothing more to ask.
                return Ok(Decision::Cancel);
            }
            if let Some(decision) = Self::parse_line(&line, group.len()) {
                return Ok(decision);
            }
            writeln!(out, "Unrecognized choice: {}", line.trim())?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keep() {
        assert_eq!(TerminalPrompt::parse_line("1", 3), Some(Decision::Keep(0)));
        assert_eq!(TerminalPrompt::parse_line(" 3 \n", 3), Some(Decision::Keep(2)));
    }

    #[test]
    fn test_parse_skip_and_exit() {
        assert_eq!(TerminalPrompt::parse_line("s", 2), Some(Decision::Skip));
        assert_eq!(TerminalPrompt::parse_line("S", 2), Some(Decision::Skip));
        assert_eq!(TerminalPrompt::parse_line("e", 2), Some(Decision::Cancel));
        assert_eq!(TerminalPrompt::parse_line("E", 2), Some(Decision::Cancel));
    }

    #[test]
    fn test_parse_rejects_out_of_range_and_garbage() {
        assert_eq!(TerminalPrompt::parse_line("0", 3), None);
        assert_eq!(TerminalPrompt::parse_line("4", 3), None);
        assert_eq!(TerminalPrompt::parse_line("keep", 3), None);
        assert_eq!(TerminalPrompt::parse_line("", 3), None);
    }
}
