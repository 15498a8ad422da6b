use std::io::{self, IsTerminal, Write};

use termion::color::{self, Fg};
use termion::style::{Bold, Reset};

use crate::{IndexType, MatchResult};

/// How matched characters are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Plain,
    /// Bold light green, for terminals.
    Ansi,
}

impl Highlight {
    /// [`Highlight::Ansi`] if stdout is a terminal.
    pub fn detect() -> Self {
        if io::stdout().is_terminal() {
            Highlight::Ansi
        } else {
            Highlight::Plain
        }
    }
}

/// Render `line`, wrapping the characters at `indices` in highlight escapes.
pub fn highlight(line: &str, indices: &[IndexType], style: Highlight) -> String {
    if style == Highlight::Plain || indices.is_empty() {
        return line.to_string();
    }

    let mut ret = String::with_capacity(line.len() + indices.len() * 16);
    let mut peekable = indices.iter().peekable();
    for (idx, ch) in line.chars().enumerate() {
        if peekable.peek().is_some_and(|&&next| next as usize == idx) {
            ret.push_str(&format!("{}{}{}{}", Bold, Fg(color::LightGreen), ch, Reset));
            peekable.next();
        } else {
            ret.push(ch);
        }
    }

    ret
}

/// Write one line per result, or only the best one with `first_only`.
pub fn print_results<W: Write>(
    out: &mut W,
    results: &[MatchResult],
    first_only: bool,
    style: Highlight,
) -> io::Result<()> {
    let limit = if first_only { 1 } else { results.len() };
    for result in results.iter().take(limit) {
        writeln!(out, "{}", highlight(result.candidate, &result.indices, style))?;
    }
    Ok(())
}
