//! User interaction seam for the pipelines.
//!
//! The modeling host's dialogs become a small trait: a selection prompt and
//! a text input. `TermPrompt` is the terminal implementation; tests use a
//! scripted fake. Cancelling (empty selection, end of input) is a normal
//! outcome, reported as `None`.

use std::io::{BufRead, Write};

use crate::error::Result;

pub trait Prompt {
    /// Let the user pick one of the options. `None` means cancelled.
    fn select(&mut self, title: &str, options: &[String]) -> Result<Option<usize>>;

    /// Ask for a line of text, offering a default. `None` means cancelled.
    fn input(&mut self, title: &str, default: &str) -> Result<Option<String>>;
}

/// Numbered-menu prompt on stdin/stdout. An empty line or EOF cancels a
/// selection; EOF cancels an input, an empty line accepts the default.
pub struct TermPrompt;

impl Prompt for TermPrompt {
    fn select(&mut self, title: &str, options: &[String]) -> Result<Option<usize>> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{title}")?;
        for (index, option) in options.iter().enumerate() {
            writeln!(out, "  {}) {}", index + 1, option)?;
        }
        write!(out, "Keuze [1-{}]: ", options.len())?;
        out.flush()?;

        let Some(line) = read_line()? else {
            return Ok(None);
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match trimmed.parse::<usize>() {
            Ok(number) if (1..=options.len()).contains(&number) => Ok(Some(number - 1)),
            _ => Ok(None),
        }
    }

    fn input(&mut self, title: &str, default: &str) -> Result<Option<String>> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        write!(out, "{title} [{default}]: ")?;
        out.flush()?;

        let Some(line) = read_line()? else {
            return Ok(None);
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            Ok(Some(default.to_string()))
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }
}

fn read_line() -> Result<Option<String>> {
    let stdin = std::io::stdin();
    let mut line = String::new();
    let read = stdin.lock().read_line(&mut line)?;
    if read == 0 { Ok(None) } else { Ok(Some(line)) }
}
