//! Discount domain - price drop detection and severity

mod discount_evaluator;

pub use discount_evaluator::DiscountEvaluator;

use serde::{Deserialize, Serialize};

use crate::domain::item::TrackedItem;
use crate::domain::price::PriceQuote;

/// Coarse discount magnitude, picks the display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeverityTier {
    Low,
    Medium,
    High,
    Extreme,
}

impl SeverityTier {
    /// Thresholds are inclusive lower bounds, checked from the top.
    pub fn from_percent(discount_percent: u8) -> Self {
        if discount_percent >= 75 {
            SeverityTier::Extreme
        } else if discount_percent >= 50 {
            SeverityTier::High
        } else if discount_percent >= 25 {
            SeverityTier::Medium
        } else {
            SeverityTier::Low
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            SeverityTier::Extreme => "#E74C3C", // deep red
            SeverityTier::High => "#E67E22",    // orange
            SeverityTier::Medium => "#F39C12",  // yellow
            SeverityTier::Low => "#3498DB",     // blue
        }
    }
}

/// A detected price drop
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountRecord {
    pub item: TrackedItem,
    pub quote: PriceQuote,
    /// Baseline the drop was measured against
    pub reference_price: f64,
    /// Always within 1..=99
    pub discount_percent: u8,
    pub severity_tier: SeverityTier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_resolve_upwards() {
        assert_eq!(SeverityTier::from_percent(1), SeverityTier::Low);
        assert_eq!(SeverityTier::from_percent(24), SeverityTier::Low);
        assert_eq!(SeverityTier::from_percent(25), SeverityTier::Medium);
        assert_eq!(SeverityTier::from_percent(49), SeverityTier::Medium);
        assert_eq!(SeverityTier::from_percent(50), SeverityTier::High);
        assert_eq!(SeverityTier::from_percent(74), SeverityTier::High);
        assert_eq!(SeverityTier::from_percent(75), SeverityTier::Extreme);
        assert_eq!(SeverityTier::from_percent(99), SeverityTier::Extreme);
    }

    #[test]
    fn test_tier_is_monotonic() {
        let tiers: Vec<SeverityTier> = (1..100).map(SeverityTier::from_percent).collect();
        assert!(tiers.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_tier_colors() {
        assert_eq!(SeverityTier::Extreme.color(), "#E74C3C");
        assert_eq!(SeverityTier::High.color(), "#E67E22");
        assert_eq!(SeverityTier::Medium.color(), "#F39C12");
        assert_eq!(SeverityTier::Low.color(), "#3498DB");
    }
}
