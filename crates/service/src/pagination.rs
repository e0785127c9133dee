//! Pagination utilities for service layer
//!
//! The catalog only supports a leading slice: `?limit=N` keeps the first `N`
//! entries of the stored order.

/// Leading integer of `raw`, read the way query and path values are read by
/// the catalog: leading whitespace skipped, an optional sign, then digits up
/// to the first non-digit (`"2abc"` is 2, `"1.5"` is 1, `"abc"` is `None`).
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let value = rest[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// Optional cap on the number of returned items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Limit(Option<usize>);

impl Limit {
    /// Parse a raw query value by its leading integer. Values without one, or
    /// with a negative one, are ignored, which leaves the list untruncated.
    pub fn parse(raw: Option<&str>) -> Self {
        Self(
            raw.and_then(parse_int_prefix)
                .and_then(|n| usize::try_from(n).ok()),
        )
    }

    pub fn get(self) -> Option<usize> {
        self.0
    }

    /// Truncate to the first `N` items when a limit is set.
    pub fn apply<T>(self, mut items: Vec<T>) -> Vec<T> {
        if let Some(n) = self.0 {
            items.truncate(n);
        }
        items
    }
}
