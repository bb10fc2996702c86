//! Feature date parsing
//!
//! Feature `time` values are free text scraped from changelog pages and
//! arrive in several shapes. Parsing is deliberately lossy: anything that
//! is not one of the two recognized formats maps to the Unix epoch, which
//! sinks the entry to the end of a date-descending sort instead of
//! erroring. Downstream sorting depends on this exact behavior.

use chrono::NaiveDate;

/// Sentinel for unknown/unparsable dates (1970-01-01)
pub fn epoch() -> NaiveDate {
    NaiveDate::default()
}

/// Parse a free-text feature date.
///
/// Tries a strict `YYYY-MM-DD` prefix first (trailing text is ignored),
/// then `M/D/YYYY` on the first whitespace-delimited token, and finally
/// falls back to [`epoch`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use cmx_common::dates::{epoch, parse_feature_date};
///
/// let march5 = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(parse_feature_date("2024-03-05 some text"), march5);
/// assert_eq!(parse_feature_date("3/5/2024"), march5);
/// assert_eq!(parse_feature_date("not a date"), epoch());
/// ```
pub fn parse_feature_date(raw: &str) -> NaiveDate {
    let trimmed = raw.trim();

    // Strict ISO prefix: exactly "YYYY-MM-DD" in the first ten bytes
    if let Some(head) = trimmed.get(..10) {
        let bytes = head.as_bytes();
        if bytes[4] == b'-' && bytes[7] == b'-' {
            if let Ok(date) = NaiveDate::parse_from_str(head, "%Y-%m-%d") {
                return date;
            }
        }
    }

    // Slash format on the leading token: M/D/YYYY, no zero padding required
    if let Some(token) = trimmed.split_whitespace().next() {
        if let Ok(date) = NaiveDate::parse_from_str(token, "%m/%d/%Y") {
            return date;
        }
    }

    epoch()
}
