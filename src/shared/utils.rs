//! Utility functions and helpers

use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone};
use sha2::{Digest, Sha256};

/// Calendar-day bucket of a local timestamp, `YYYYMMDD`.
pub fn day_bucket(now: &DateTime<FixedOffset>) -> String {
    now.format("%Y%m%d").to_string()
}

/// Midnight of the day `now` falls on, in the same offset.
pub fn start_of_day(now: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    now.offset()
        .from_local_datetime(&midnight)
        .single()
        .unwrap_or(*now)
}

/// Hex digest of the parts, order-sensitive. Callers sort first when order must not matter.
pub fn stable_hash<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_ref().as_bytes());
        hasher.update([0x1f]);
    }
    hex::encode(&hasher.finalize()[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_day_bucket_uses_local_date() {
        // 23:30 at +08:00 is still the 5th locally even though UTC is the 5th 15:30
        assert_eq!(day_bucket(&at("2024-03-05T23:30:00+08:00")), "20240305");
        assert_eq!(day_bucket(&at("2024-03-06T00:10:00+08:00")), "20240306");
    }

    #[test]
    fn test_start_of_day_keeps_offset() {
        let midnight = start_of_day(&at("2024-03-05T17:45:12-05:00"));
        assert_eq!(midnight.to_rfc3339(), "2024-03-05T00:00:00-05:00");
    }

    #[test]
    fn test_stable_hash_is_deterministic() {
        let a = stable_hash(["appstore", "123_us_68.00"]);
        let b = stable_hash(vec!["appstore".to_string(), "123_us_68.00".to_string()]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 24);
        assert_ne!(a, stable_hash(["appstore", "123_us_68.01"]));
        // separator prevents concatenation collisions
        assert_ne!(stable_hash(["ab", "c"]), stable_hash(["a", "bc"]));
    }
}
