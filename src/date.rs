//! Parsing of frontmatter dates into instants.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parses a frontmatter date into a UTC instant, or `None` if the string
/// isn't a date in any of the supported formats:
///
/// * RFC 3339, e.g. `2021-04-19T12:07:02.971Z` or `2021-04-19T09:07:02-03:00`
/// * RFC 2822, e.g. `Mon, 19 Apr 2021 12:07:02 +0000`
/// * `2021-04-19T12:07:02` and `2021-04-19 12:07:02`, read as UTC
/// * `2021-04-19`, read as midnight UTC
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(input) {
        return Some(date.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
