//! Discount detection against the tracked reference price

use crate::domain::item::TrackedItem;
use crate::domain::price::PriceQuote;

use super::{DiscountRecord, SeverityTier};

pub struct DiscountEvaluator;

impl DiscountEvaluator {
    /// `Some` only for a strictly lower, non-zero current price. The item's own reference
    /// wins; the vendor list price is used only for items that have none.
    pub fn evaluate(item: &TrackedItem, quote: &PriceQuote) -> Option<DiscountRecord> {
        let current = quote.current_numeric_price;
        let reference = item.reference_price().or(quote.list_price)?;

        if !(current > 0.0 && current < reference) {
            return None;
        }

        let discount_percent = Self::discount_percent(current, reference);

        Some(DiscountRecord {
            item: item.clone(),
            quote: quote.clone(),
            reference_price: reference,
            discount_percent,
            severity_tier: SeverityTier::from_percent(discount_percent),
        })
    }

    /// Rounded half-up, then held inside 1..=99 so a drop never reads as 0% or 100%.
    pub fn discount_percent(current: f64, reference: f64) -> u8 {
        let raw = ((1.0 - current / reference) * 100.0).round();
        raw.clamp(1.0, 99.0) as u8
    }
}
