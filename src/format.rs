//! Amount parsing and display formatting.
//!
//! Amounts are whole rupiah. Display uses the `id-ID` convention: digits
//! grouped in threes with `.` as the separator, no decimals.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

/// Thousands separator for `id-ID`.
pub const GROUP_SEPARATOR: char = '.';

/// Keep only ASCII digits.
pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Parse user input into an amount: every non-digit is dropped first, so
/// `"Rp 1.500.000"` becomes `1_500_000`. Empty or overflowing input is 0.
pub fn parse_amount(raw: &str) -> u64 {
    strip_non_digits(raw).parse().unwrap_or(0)
}

/// Parse the leading integer of `raw`, the way form values and data
/// attributes were historically read: leading whitespace and an optional
/// sign are accepted, parsing stops at the first non-digit.
///
/// Returns `None` when no digit follows, or on overflow.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let Ok(magnitude) = rest[..end].parse::<i64>() else {
        return None;
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Leading-integer parse clamped to a non-negative amount, 0 on failure.
pub fn parse_leading_amount(raw: &str) -> u64 {
    parse_leading_int(raw).map_or(0, |n| u64::try_from(n).unwrap_or(0))
}

/// Group a run of ASCII digits in threes: `"1500000"` → `"1.500.000"`.
///
/// Callers pass digit-only strings (see [`strip_non_digits`]); leading zeros
/// are kept as typed.
pub fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Display form of an amount; zero renders as an empty field.
pub fn format_amount(amount: u64) -> String {
    if amount == 0 {
        return String::new();
    }
    group_digits(&amount.to_string())
}
