//! Price domain - vendor payloads, canonical quotes and currency display

mod price_format;
mod price_normalizer;

pub use price_format::{PriceFormat, SymbolPlacement};
pub use price_normalizer::{Normalized, PriceNormalizer};

use crate::shared::i18n::Catalog;

/// Price as a vendor reports it
#[derive(Debug, Clone, PartialEq)]
pub enum RawPrice {
    /// Major currency units, e.g. `9.99`
    Major { amount: f64, formatted: Option<String> },
    /// Integer minor units with the currency exponent, e.g. `999` cents with exponent 2
    Minor { amount: i64, exponent: u32, formatted: Option<String> },
}

/// An icon variant with its edge length in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct IconAsset {
    pub size_px: u32,
    pub url: String,
}

/// Extra line appended to event notes, label resolved at assembly time
#[derive(Debug, Clone, PartialEq)]
pub struct NoteLine {
    pub label: Catalog,
    pub value: String,
}

/// Presentation data that travels with a price
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingDetails {
    pub name: Option<String>,
    pub link_url: Option<String>,
    pub cover_image: Option<String>,
    pub screenshots: Vec<String>,
    pub icons: Vec<IconAsset>,
    pub extra_notes: Vec<NoteLine>,
}

/// Result of one successful vendor lookup, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawPricePayload {
    pub price: RawPrice,
    /// Vendor's own pre-discount price, when it reports one
    pub list_price: Option<RawPrice>,
    pub currency: Option<String>,
    pub listing: ListingDetails,
}

/// Canonical current price of one item. Lives only for the current batch.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub item_id: String,
    pub region: String,
    pub current_numeric_price: f64,
    pub current_display_price: String,
    pub list_price: Option<f64>,
    pub list_display_price: Option<String>,
    pub currency_code: String,
    pub listing: ListingDetails,
}

impl PriceQuote {
    /// Render another amount the way this quote's price is displayed.
    pub fn format_like(&self, amount: f64) -> String {
        PriceFormat::detect(&self.current_display_price)
            .unwrap_or_default()
            .render(amount)
    }
}
