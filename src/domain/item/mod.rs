//! Item domain - tracked items and their configuration syntax

mod item_parser;

pub use item_parser::ItemSpecParser;

use serde::{Deserialize, Serialize};

/// One monitored item: vendor identifier, store region and the baseline price
/// a drop is measured against. Fields are fixed once constructed.
///
/// Items listed from a vendor account carry no baseline of their own; the vendor's
/// list price stands in for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedItem {
    identifier: String,
    region: String,
    reference_price: Option<f64>,
}

impl TrackedItem {
    /// Returns `None` unless identifier and region are non-empty and the price is a positive number.
    pub fn new(identifier: &str, region: &str, reference_price: f64) -> Option<Self> {
        let identifier = identifier.trim();
        let region = region.trim();

        if identifier.is_empty() || region.is_empty() {
            return None;
        }
        if !reference_price.is_finite() || reference_price <= 0.0 {
            return None;
        }

        Some(Self {
            identifier: identifier.to_string(),
            region: region.to_lowercase(),
            reference_price: Some(reference_price),
        })
    }

    /// Item found on a vendor account, measured against the vendor's own list price.
    pub fn discovered(identifier: &str, region: &str) -> Option<Self> {
        let identifier = identifier.trim();
        let region = region.trim();

        if identifier.is_empty() || region.is_empty() {
            return None;
        }

        Some(Self {
            identifier: identifier.to_string(),
            region: region.to_lowercase(),
            reference_price: None,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn reference_price(&self) -> Option<f64> {
        self.reference_price
    }

    /// Canonical `id_region_price` form (`id_region` for discovered items);
    /// equal items always render identically.
    pub fn spec(&self) -> String {
        match self.reference_price {
            Some(price) => format!("{}_{}_{}", self.identifier, self.region, price),
            None => format!("{}_{}", self.identifier, self.region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_item_validation() {
        assert!(TrackedItem::new("123", "us", 68.0).is_some());
        assert!(TrackedItem::new("", "us", 68.0).is_none());
        assert!(TrackedItem::new("123", " ", 68.0).is_none());
        assert!(TrackedItem::new("123", "us", 0.0).is_none());
        assert!(TrackedItem::new("123", "us", -1.0).is_none());
        assert!(TrackedItem::new("123", "us", f64::NAN).is_none());
    }

    #[test]
    fn test_spec_is_canonical() {
        let a = TrackedItem::new("123", "US", 68.0).unwrap();
        let b = TrackedItem::new(" 123 ", "us", 68.00).unwrap();
        assert_eq!(a.spec(), "123_us_68");
        assert_eq!(a.spec(), b.spec());
    }

    #[test]
    fn test_discovered_item_has_no_reference() {
        let item = TrackedItem::discovered("620", "CN").unwrap();
        assert_eq!(item.reference_price(), None);
        assert_eq!(item.region(), "cn");
        assert_eq!(item.spec(), "620_cn");
        assert_ne!(item.spec(), TrackedItem::new("620", "cn", 70.0).unwrap().spec());
        assert!(TrackedItem::discovered(" ", "cn").is_none());
    }
}
