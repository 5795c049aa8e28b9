use chrono::{DateTime, NaiveDateTime, Utc};

/// Usernames are lowercase and limited to `[a-z0-9_]`; everything else is dropped.
pub fn sanitize_username(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

/// Shareable link to a user's public composer.
pub fn profile_link(origin: &str, username: &str) -> String {
    format!("{}/#/@{}", origin.trim_end_matches('/'), username)
}

/// Epoch milliseconds for a store timestamp. Accepts RFC 3339 and the
/// store's own `YYYY-MM-DD HH:MM:SS` (taken as UTC).
pub fn epoch_millis(timestamp: &str) -> Option<i64> {
    timestamp
        .parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| ndt.and_utc())
        })
        .map(|dt| dt.timestamp_millis())
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_lowercases_and_filters() {
        assert_eq!(sanitize_username("Nil_Noman99"), "nil_noman99");
        assert_eq!(sanitize_username("nil noman!"), "nilnoman");
        assert_eq!(sanitize_username("@nil.n-m"), "nilnm");
        assert_eq!(sanitize_username("নীল"), "");
    }

    #[test]
    fn link_format() {
        assert_eq!(profile_link("https://chirkut.app", "nil"), "https://chirkut.app/#/@nil");
        assert_eq!(profile_link("https://chirkut.app/", "nil"), "https://chirkut.app/#/@nil");
    }

    #[test]
    fn store_timestamps_are_utc() {
        assert_eq!(epoch_millis("1970-01-01 00:00:01"), Some(1000));
        assert_eq!(epoch_millis("2026-10-16 12:00:00"), Some(1_792_152_000_000));
    }

    #[test]
    fn rfc3339_timestamps() {
        assert_eq!(epoch_millis("1970-01-01T00:00:02Z"), Some(2000));
        assert_eq!(epoch_millis("1970-01-01T01:00:00+01:00"), Some(0));
    }

    #[test]
    fn garbage_timestamp() {
        assert_eq!(epoch_millis("yesterday"), None);
        assert_eq!(epoch_millis(""), None);
    }
}
