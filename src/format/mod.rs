//! Number formatting for dashboard counters and figures.
//!
//! The thousands grouping is pattern-based rather than a numeric parser:
//! any run of ASCII digits in the input is grouped in threes from the right,
//! and everything else passes through untouched. This keeps the output
//! identical to what the dashboard templates render for values that arrive
//! as strings (`"1234.5"`, `"-9876"`, `"N/A"`).

use std::borrow::Cow;
use std::fmt::Display;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Thousands separator inserted between digit groups.
const SEPARATOR: char = ',';

/// Matches a maximal run of ASCII digits together with the word character
/// (if any) immediately before it.
///
/// The leading capture matters for runs glued to a word such as `abc123456`:
/// there is no word boundary between `c` and `1`, so a run whose length is a
/// multiple of three also gets a separator in front of it.
static DIGIT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z_]?)([0-9]+)").expect("digit run regex must compile")
});

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Insert thousands separators into every digit run of `value`'s display form.
///
/// ```rust,ignore
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(-1234567), "-1,234,567");
/// assert_eq!(format_number("N/A"), "N/A");
/// ```
pub fn format_number(value: impl Display) -> String {
    group_digit_runs(&value.to_string()).into_owned()
}

/// Render a float with a fixed number of decimals.
///
/// Non-finite values render as `NaN` / `Infinity` / `-Infinity`, which is how
/// the figures show up when the server sends them.
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    format!("{value:.decimals$}")
}

/// Parse the leading integer of `text` the way `parseInt(text, 10)` does.
///
/// Leading whitespace is skipped, an optional sign is accepted, and the
/// longest digit prefix is consumed. Returns `None` when no digit follows.
/// Values that do not fit in an `i64` saturate.
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };

    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });

    Some(if negative { -magnitude } else { magnitude })
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn group_digit_runs(text: &str) -> Cow<'_, str> {
    DIGIT_RUN_RE.replace_all(text, |caps: &Captures<'_>| {
        let prefix = caps.get(1).map_or("", |m| m.as_str());
        let digits = caps.get(2).map_or("", |m| m.as_str());

        let mut out = String::with_capacity(prefix.len() + digits.len() + digits.len() / 3 + 1);
        out.push_str(prefix);
        if !prefix.is_empty() && digits.len() % 3 == 0 {
            out.push(SEPARATOR);
        }
        out.push_str(&group_digits(digits));
        out
    })
}

/// Group a pure digit string in threes from the right.
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(SEPARATOR);
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
