//! Conversion of vendor payloads into canonical quotes

use crate::domain::item::TrackedItem;
use crate::shared::errors::FetchError;

use super::{PriceFormat, PriceQuote, RawPrice, RawPricePayload};

/// Outcome of normalizing one payload
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Priced(PriceQuote),
    /// Price is exactly zero: free right now, never a discount
    Free,
}

pub struct PriceNormalizer;

impl PriceNormalizer {
    /// `reference_display_hint` is a sample formatted price used when the vendor sends
    /// only a number; its symbol placement and decimals are replicated.
    pub fn normalize(
        item: &TrackedItem,
        raw: RawPricePayload,
        reference_display_hint: &str,
    ) -> Result<Normalized, FetchError> {
        let (amount, formatted) = Self::major_units(raw.price);

        if !amount.is_finite() || amount < 0.0 {
            return Err(FetchError::Malformed(format!(
                "invalid price {} for {}",
                amount,
                item.identifier()
            )));
        }
        if amount == 0.0 {
            return Ok(Normalized::Free);
        }

        let display = Self::display(formatted, amount, reference_display_hint);

        // an unusable list price only loses the vendor baseline, never the quote
        let list = raw
            .list_price
            .map(Self::major_units)
            .filter(|(list, _)| list.is_finite() && *list > 0.0)
            .map(|(list, formatted)| (list, Self::display(formatted, list, &display)));

        Ok(Normalized::Priced(PriceQuote {
            item_id: item.identifier().to_string(),
            region: item.region().to_string(),
            current_numeric_price: amount,
            current_display_price: display,
            list_price: list.as_ref().map(|(list, _)| *list),
            list_display_price: list.map(|(_, display)| display),
            currency_code: raw.currency.unwrap_or_default().to_uppercase(),
            listing: raw.listing,
        }))
    }

    fn major_units(price: RawPrice) -> (f64, Option<String>) {
        match price {
            RawPrice::Major { amount, formatted } => (amount, formatted),
            RawPrice::Minor {
                amount,
                exponent,
                formatted,
            } => (amount as f64 / 10f64.powi(exponent as i32), formatted),
        }
    }

    /// Vendor string when it holds a number, else `amount` rendered like `hint`.
    fn display(formatted: Option<String>, amount: f64, hint: &str) -> String {
        formatted
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && PriceFormat::detect(s).is_some())
            .unwrap_or_else(|| PriceFormat::detect(hint).unwrap_or_default().render(amount))
    }
}
