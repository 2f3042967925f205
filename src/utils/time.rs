use chrono::{DateTime, SecondsFormat, Utc};

/// Current UTC time as ISO-8601 with a `Z` suffix, e.g. `2026-10-19T08:15:30.123456Z`.
///
/// Stored timestamps are strings in this format, so they sort chronologically.
pub fn now_iso() -> String {
    to_iso(Utc::now())
}

pub fn to_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_iso_is_utc() {
        let ts = now_iso();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_to_iso_sorts_chronologically() {
        let earlier = Utc::now() - chrono::Duration::hours(12);
        assert!(to_iso(earlier) < now_iso());
    }
}
