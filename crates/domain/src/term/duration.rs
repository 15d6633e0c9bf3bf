//! Duration literals accepted by `sleep(...)`
//!
//! Two forms are accepted:
//! - a bare integer, interpreted as milliseconds (`sleep(100)`)
//! - a unit sequence such as `250ms`, `1s`, `1m30s`, `1.5s`, `500us`, `2h`

use std::time::Duration;

use crate::errors::DomainError;

const NANOS_PER_UNIT: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60_000_000_000),
    ("h", 3_600_000_000_000),
];

/// Parse a duration literal
///
/// # Errors
///
/// Returns [`DomainError::InvalidDuration`] for empty input, signs, unknown
/// units, missing units after a fractional number, or overflow.
pub fn parse_duration(input: &str) -> Result<Duration, DomainError> {
    let text = input.trim();
    if text.is_empty() {
        return Err(DomainError::InvalidDuration("empty duration".to_string()));
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        let millis: u64 = text
            .parse()
            .map_err(|_| DomainError::InvalidDuration(format!("{text} is out of range")))?;
        return Ok(Duration::from_millis(millis));
    }

    let mut total: u128 = 0;
    let mut rest = text;
    while !rest.is_empty() {
        let (nanos, tail) = parse_component(rest, text)?;
        total = total
            .checked_add(nanos)
            .ok_or_else(|| DomainError::InvalidDuration(format!("{text} is out of range")))?;
        rest = tail;
    }

    let nanos = u64::try_from(total)
        .map_err(|_| DomainError::InvalidDuration(format!("{text} is out of range")))?;
    Ok(Duration::from_nanos(nanos))
}

/// Parse one `<number><unit>` component, returning its length in nanoseconds
fn parse_component<'a>(input: &'a str, whole: &str) -> Result<(u128, &'a str), DomainError> {
    let invalid = || DomainError::InvalidDuration(whole.to_string());

    let int_len = input.bytes().take_while(u8::is_ascii_digit).count();
    let (int_part, mut rest) = input.split_at(int_len);

    let mut frac_part = "";
    if let Some(after_dot) = rest.strip_prefix('.') {
        let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
        frac_part = &after_dot[..frac_len];
        rest = &after_dot[frac_len..];
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }

    let unit_len = rest
        .char_indices()
        .find(|(_, c)| c.is_ascii_digit() || *c == '.')
        .map_or(rest.len(), |(i, _)| i);
    let (unit, rest) = rest.split_at(unit_len);
    let multiplier = NANOS_PER_UNIT
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, nanos)| *nanos)
        .ok_or_else(invalid)?;

    let int_value: u128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| invalid())?
    };
    let mut nanos = int_value.checked_mul(multiplier).ok_or_else(invalid)?;

    if !frac_part.is_empty() {
        // Digits beyond nanosecond precision are dropped.
        let digits = &frac_part[..frac_part.len().min(18)];
        let frac_value: u128 = digits.parse().map_err(|_| invalid())?;
        let scale = 10u128.pow(u32::try_from(digits.len()).map_err(|_| invalid())?);
        nanos = nanos
            .checked_add(frac_value * multiplier / scale)
            .ok_or_else(invalid)?;
    }

    Ok((nanos, rest))
}
