//! Term specification parser
//!
//! Pure and re-entrant: parsing never touches failpoint state.

use std::num::NonZeroU64;

use super::{Action, Literal, Segment, Term, duration::parse_duration};
use crate::errors::DomainError;

const CHAIN_SEPARATOR: &str = "->";

/// Parse a term specification such as `3*return("x")->off`
///
/// The returned term keeps `spec` verbatim for rendering.
///
/// # Errors
///
/// Returns [`DomainError::InvalidTerm`] for an empty specification, an empty
/// segment, a non-positive count, a percentage outside `(0, 100]`, an unknown
/// action, a malformed literal or duration, or unbalanced quotes.
pub fn parse(spec: &str) -> Result<Term, DomainError> {
    if spec.trim().is_empty() {
        return Err(DomainError::invalid_term("empty term"));
    }

    let segments = split_chain(spec)?
        .into_iter()
        .map(parse_segment)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Term::from_parts(spec.to_owned(), segments))
}

/// Split on `->` outside of string literals
fn split_chain(spec: &str) -> Result<Vec<&str>, DomainError> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_string = false;
    let mut escaped = false;

    let bytes = spec.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
        } else if b == b'"' {
            in_string = true;
        } else if bytes[i..].starts_with(CHAIN_SEPARATOR.as_bytes()) {
            parts.push(&spec[start..i]);
            i += CHAIN_SEPARATOR.len();
            start = i;
            continue;
        }
        i += 1;
    }

    if in_string {
        return Err(DomainError::invalid_term("unterminated string literal"));
    }
    parts.push(&spec[start..]);
    Ok(parts)
}

fn parse_segment(raw: &str) -> Result<Segment, DomainError> {
    let mut rest = raw.trim();
    if rest.is_empty() {
        return Err(DomainError::invalid_term("empty segment"));
    }

    let mut probability = None;
    if let Some((head, tail)) = numeric_prefix(rest, '%') {
        probability = Some(parse_percent(head)?);
        rest = tail.trim_start();
    }

    let mut count = None;
    if let Some((head, tail)) = numeric_prefix(rest, '*') {
        count = Some(parse_count(head)?);
        rest = tail.trim_start();
    }

    let action = parse_action(rest)?;
    Ok(Segment::new(probability, count, action))
}

/// Split `<number><delim><rest>` when everything before `delim` looks numeric
fn numeric_prefix(input: &str, delim: char) -> Option<(&str, &str)> {
    let idx = input.find(delim)?;
    let head = input[..idx].trim();
    let numeric = !head.is_empty()
        && head
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'));
    numeric.then(|| (head, &input[idx + delim.len_utf8()..]))
}

fn parse_percent(text: &str) -> Result<f64, DomainError> {
    let value: f64 = text
        .parse()
        .map_err(|_| DomainError::invalid_term(format!("invalid percentage `{text}`")))?;
    if !value.is_finite() || value <= 0.0 || value > 100.0 {
        return Err(DomainError::invalid_term(format!(
            "percentage `{text}` must be in (0, 100]"
        )));
    }
    Ok(value)
}

fn parse_count(text: &str) -> Result<NonZeroU64, DomainError> {
    text.parse::<u64>()
        .ok()
        .and_then(NonZeroU64::new)
        .ok_or_else(|| {
            DomainError::invalid_term(format!("count `{text}` must be a positive integer"))
        })
}

fn parse_action(text: &str) -> Result<Action, DomainError> {
    let name_len = text
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .count();
    let (name, rest) = text.split_at(name_len);
    let args = parse_arguments(rest.trim_start())?;

    match name {
        "off" => match args {
            None => Ok(Action::Off),
            Some(_) => Err(DomainError::invalid_term("`off` takes no argument")),
        },
        "return" => match args.map(str::trim) {
            None | Some("") => Ok(Action::Return(None)),
            Some(literal) => parse_literal(literal).map(|l| Action::Return(Some(l))),
        },
        "sleep" => match args.map(str::trim) {
            None | Some("") => Err(DomainError::invalid_term("`sleep` requires a duration")),
            Some(arg) => parse_sleep(arg).map(Action::Sleep),
        },
        "panic" => parse_optional_message(args).map(Action::Panic),
        "print" => parse_optional_message(args).map(Action::Print),
        "" => Err(DomainError::invalid_term(format!("missing action in `{text}`"))),
        other => Err(DomainError::invalid_term(format!("unknown action `{other}`"))),
    }
}

/// Extract the text between `(` and the final `)`, if any
fn parse_arguments(rest: &str) -> Result<Option<&str>, DomainError> {
    if rest.is_empty() {
        return Ok(None);
    }
    let inner = rest
        .strip_prefix('(')
        .and_then(|r| r.trim_end().strip_suffix(')'))
        .ok_or_else(|| DomainError::invalid_term(format!("unexpected `{rest}` after action")))?;
    Ok(Some(inner))
}

fn parse_sleep(arg: &str) -> Result<std::time::Duration, DomainError> {
    let text = if arg.starts_with('"') {
        parse_string_literal(arg)?
    } else {
        arg.to_string()
    };
    parse_duration(&text).map_err(|e| DomainError::invalid_term(e.to_string()))
}

fn parse_optional_message(args: Option<&str>) -> Result<Option<String>, DomainError> {
    match args.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_string_literal(text).map(Some),
    }
}

fn parse_literal(text: &str) -> Result<Literal, DomainError> {
    if text.starts_with('"') {
        return parse_string_literal(text).map(Literal::String);
    }
    match text {
        "true" => return Ok(Literal::Bool(true)),
        "false" => return Ok(Literal::Bool(false)),
        _ => {},
    }

    let digits = text.strip_prefix('-').unwrap_or(text);
    let numeric = digits.bytes().next().is_some_and(|b| b.is_ascii_digit())
        && digits.bytes().all(|b| b.is_ascii_digit() || b == b'.');
    if numeric {
        if digits.contains('.') {
            if let Some(value) = text.parse::<f64>().ok().filter(|v| v.is_finite()) {
                return Ok(Literal::Float(value));
            }
        } else if let Ok(value) = text.parse::<i64>() {
            return Ok(Literal::Integer(value));
        }
    }

    Err(DomainError::invalid_term(format!("malformed literal `{text}`")))
}

/// Parse a complete double-quoted string literal, resolving escapes
fn parse_string_literal(text: &str) -> Result<String, DomainError> {
    let body = text
        .strip_prefix('"')
        .ok_or_else(|| DomainError::invalid_term(format!("expected string literal, got `{text}`")))?;

    let mut value = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => {
                let trailing = &body[idx + 1..];
                if !trailing.trim().is_empty() {
                    return Err(DomainError::invalid_term(format!(
                        "unexpected `{trailing}` after string literal"
                    )));
                }
                return Ok(value);
            },
            '\\' => {
                let escaped = match chars.next() {
                    Some((_, '"')) => '"',
                    Some((_, '\\')) => '\\',
                    Some((_, 'n')) => '\n',
                    Some((_, 't')) => '\t',
                    Some((_, 'r')) => '\r',
                    Some((_, other)) => {
                        return Err(DomainError::invalid_term(format!(
                            "unknown escape `\\{other}`"
                        )));
                    },
                    None => break,
                };
                value.push(escaped);
            },
            other => value.push(other),
        }
    }

    Err(DomainError::invalid_term("unterminated string literal"))
}
