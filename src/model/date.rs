//! Year extraction from free-text approximate dates.

/// Parse the leading integer of an approximate date.
///
/// Leading whitespace and a single sign are allowed, then at least one
/// digit; everything after the digits is ignored. "1995-03" gives 1995,
/// "early 2000s" gives `None`.
pub fn parse_year(approximate_date: &str) -> Option<i32> {
    let s = approximate_date.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }

    let value: i32 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}
