//! Cache key construction shared by every source

use chrono::{DateTime, FixedOffset};

use crate::domain::item::TrackedItem;
use crate::shared::utils::{day_bucket, stable_hash};

pub struct CacheKey;

impl CacheKey {
    /// `<hash of scope + sorted item specs>_<YYYYMMDD>`. Input order does not matter,
    /// any change to the item set or to the local calendar day yields a new key.
    pub fn compute(scope: &str, items: &[TrackedItem], now: &DateTime<FixedOffset>) -> String {
        let mut specs: Vec<String> = items.iter().map(TrackedItem::spec).collect();
        specs.sort();

        let digest = stable_hash(std::iter::once(scope.to_string()).chain(specs));
        format!("{}_{}", digest, day_bucket(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::ItemSpecParser;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_same_items_same_day_same_key() {
        let items = ItemSpecParser::parse("123_us_68.00,456_cn_38.00");
        let morning = CacheKey::compute("appstore", &items, &at("2024-03-05T08:00:00+08:00"));
        let evening = CacheKey::compute("appstore", &items, &at("2024-03-05T23:59:59+08:00"));

        assert_eq!(morning, evening);
        assert!(morning.ends_with("_20240305"));
    }

    #[test]
    fn test_key_ignores_item_order() {
        let now = at("2024-03-05T08:00:00+08:00");
        let a = ItemSpecParser::parse("123_us_68.00,456_cn_38.00");
        let b = ItemSpecParser::parse("456_CN_38, 123_us_68");

        assert_eq!(
            CacheKey::compute("appstore", &a, &now),
            CacheKey::compute("appstore", &b, &now)
        );
    }

    #[test]
    fn test_key_changes_with_items_day_or_scope() {
        let now = at("2024-03-05T08:00:00+08:00");
        let items = ItemSpecParser::parse("123_us_68.00");
        let base = CacheKey::compute("appstore", &items, &now);

        let repriced = ItemSpecParser::parse("123_us_60.00");
        assert_ne!(base, CacheKey::compute("appstore", &repriced, &now));

        let next_day = at("2024-03-06T00:00:01+08:00");
        let tomorrow = CacheKey::compute("appstore", &items, &next_day);
        assert_ne!(base, tomorrow);
        assert!(tomorrow.ends_with("_20240306"));

        assert_ne!(base, CacheKey::compute("steam", &items, &now));
    }
}
