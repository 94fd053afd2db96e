//! RFC 3339 date, time and date-time literals.
//!
//! Recognition is attempted before number scanning. Input that does not
//! have the shape of a temporal literal, or is not followed by a
//! terminator, is left to the number scanner untouched. Input with the
//! right shape but an out-of-range field is still a temporal token, with
//! the field reported.

use smallvec::SmallVec;
use smart_ir::Token;

use super::Scanner;

/// A recognized temporal literal.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Temporal {
    pub tok: Token,
    pub len: usize,
    /// Out-of-range fields as (offset, message).
    pub errors: SmallVec<[(usize, &'static str); 2]>,
}

type Errors = SmallVec<[(usize, &'static str); 2]>;

/// Recognize a temporal literal at the start of `b`.
pub(crate) fn recognize(b: &[u8]) -> Option<Temporal> {
    if b.len() < 8 || !b[0].is_ascii_digit() || !b[1].is_ascii_digit() {
        return None;
    }
    let mut errors = Errors::new();
    let (tok, len) = if b[2] == b':' || b[5] == b':' {
        (Token::Time, time_of_day(b, 0, &mut errors)?)
    } else if (b[4] == b'-' || b[7] == b'-') && b.len() >= 10 {
        let end = date(b, &mut errors)?;
        if matches!(b.get(end), Some(b'T' | b't')) {
            let end = time_of_day(b, end + 1, &mut errors)?;
            (Token::DateTime, zone(b, end, &mut errors))
        } else {
            (Token::Date, end)
        }
    } else {
        return None;
    };
    if !is_terminator(b.get(len).copied()) {
        return None;
    }
    Some(Temporal { tok, len, errors })
}

/// `YYYY-MM-DD`.
fn date(b: &[u8], errors: &mut Errors) -> Option<usize> {
    if !digits(b, 0, 4) || b[4] != b'-' || !digits(b, 5, 2) || b[7] != b'-' || !digits(b, 8, 2) {
        return None;
    }
    if !(1..=12).contains(&two_digits(b, 5)) {
        errors.push((5, "invalid month"));
    }
    // Only the tens digit of the day is checked.
    if b[8] > b'3' {
        errors.push((8, "invalid day"));
    }
    Some(10)
}

/// `HH:MM:SS[.frac]` at `i`.
fn time_of_day(b: &[u8], i: usize, errors: &mut Errors) -> Option<usize> {
    if !digits(b, i, 2)
        || b.get(i + 2) != Some(&b':')
        || !digits(b, i + 3, 2)
        || b.get(i + 5) != Some(&b':')
        || !digits(b, i + 6, 2)
    {
        return None;
    }
    if two_digits(b, i) > 23 {
        errors.push((i, "invalid hour"));
    }
    if two_digits(b, i + 3) > 59 {
        errors.push((i + 3, "invalid minute"));
    }
    if two_digits(b, i + 6) > 59 {
        errors.push((i + 6, "invalid second"));
    }
    let mut end = i + 8;
    if b.get(end) == Some(&b'.') && b.get(end + 1).is_some_and(u8::is_ascii_digit) {
        end += 1;
        while b.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
    }
    Some(end)
}

/// Optional `Z` or `±HH:MM` at `i`.
fn zone(b: &[u8], i: usize, errors: &mut Errors) -> usize {
    match b.get(i) {
        Some(b'Z' | b'z') => i + 1,
        Some(b'+' | b'-')
            if digits(b, i + 1, 2) && b.get(i + 3) == Some(&b':') && digits(b, i + 4, 2) =>
        {
            if two_digits(b, i + 1) > 23 {
                errors.push((i + 1, "invalid time zone hour"));
            }
            if two_digits(b, i + 4) > 59 {
                errors.push((i + 4, "invalid time zone minute"));
            }
            i + 6
        }
        _ => i,
    }
}

fn is_terminator(b: Option<u8>) -> bool {
    match b {
        None => true,
        Some(b) => matches!(
            b,
            b' ' | b'\t' | b'\n' | b'\r' | b'(' | b')' | b'{' | b'}' | b'$' | b'#' | b'\\'
        ),
    }
}

fn digits(b: &[u8], i: usize, n: usize) -> bool {
    b.get(i..i + n)
        .is_some_and(|s| s.iter().all(u8::is_ascii_digit))
}

fn two_digits(b: &[u8], i: usize) -> u8 {
    (b[i] - b'0') * 10 + (b[i + 1] - b'0')
}

impl Scanner<'_> {
    /// Temporal literal at the current digit, if any.
    pub(super) fn scan_temporal(&mut self) -> Option<Token> {
        let start = self.offset;
        let temporal = recognize(&self.src[start..])?;
        for &(rel, msg) in &temporal.errors {
            self.error(start + rel, msg);
        }
        // Temporal literals are ASCII.
        while self.offset < start + temporal.len {
            self.advance();
        }
        Some(temporal.tok)
    }
}

#[cfg(test)]
mod tests;
