//! Bulk assignment syntax: `name=term;name=term;...`
//!
//! Used by the bulk-set endpoint and by startup activation.

use crate::error::ApplicationError;

/// Split `body` into `(name, term)` pairs
///
/// `;` and `=` inside double-quoted string literals belong to the term.
/// Empty entries are skipped. An entry without `=` yields
/// [`ApplicationError::MalformedAssignment`] in its slot so the remaining
/// entries can still be applied.
pub fn parse_assignments(body: &str) -> Vec<Result<(String, String), ApplicationError>> {
    split_unquoted(body, ';')
        .into_iter()
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| {
            let (name, term) = split_once_unquoted(entry, '=')
                .ok_or_else(|| ApplicationError::MalformedAssignment(entry.trim().to_string()))?;
            Ok((name.trim().to_string(), term.to_string()))
        })
        .collect()
}

fn split_unquoted(input: &str, delim: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quotes = QuoteTracker::default();
    for (idx, c) in input.char_indices() {
        if quotes.feed(c) && c == delim {
            parts.push(&input[start..idx]);
            start = idx + c.len_utf8();
        }
    }
    parts.push(&input[start..]);
    parts
}

fn split_once_unquoted(input: &str, delim: char) -> Option<(&str, &str)> {
    let mut quotes = QuoteTracker::default();
    input
        .char_indices()
        .find(|&(_, c)| quotes.feed(c) && c == delim)
        .map(|(idx, c)| (&input[..idx], &input[idx + c.len_utf8()..]))
}

#[derive(Debug, Default)]
struct QuoteTracker {
    in_string: bool,
    escaped: bool,
}

impl QuoteTracker {
    /// Consume one character; returns true when it sits outside a string
    fn feed(&mut self, c: char) -> bool {
        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.in_string = false;
            }
            false
        } else {
            if c == '"' {
                self.in_string = true;
                return false;
            }
            true
        }
    }
}
