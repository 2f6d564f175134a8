//! Solana token prices from the Phantom price API

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::item::TrackedItem;
use crate::domain::price::{ListingDetails, NoteLine, RawPrice, RawPricePayload};
use crate::infrastructure::HttpClient;
use crate::shared::errors::FetchError;
use crate::shared::i18n::Catalog;
use crate::shared::types::SourceKind;

use super::{BatchContext, PriceSource};

const PRICE_URL: &str = "https://api.phantom.app/price/v1/solana:101/address";

static CHANGE_24H: Catalog = &[
    ("en", "24h Change"),
    ("zh", "24小时变化"),
    ("ja", "24時間の変動"),
    ("ko", "24시간 변동"),
    ("de", "24h-Änderung"),
    ("es", "Cambio 24h"),
    ("fr", "Variation 24h"),
    ("pt", "Variação 24h"),
    ("ru", "Изменение за 24ч"),
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPrice {
    price: f64,
    price_change_24h: Option<f64>,
}

/// Reference price of a token item is the alert threshold in USD.
pub struct PhantomSource;

impl PhantomSource {
    pub fn new() -> Self {
        Self
    }

    fn change_text(change: f64) -> String {
        if change > 0.0 {
            format!("↗ +{:.2}%", change)
        } else if change < 0.0 {
            format!("↘ {:.2}%", change)
        } else {
            "→ 0.00%".to_string()
        }
    }

    /// Six decimals, widened for sub-unit prices so three significant digits survive.
    fn usd_text(price: f64) -> String {
        let decimals = if price > 0.0 && price < 1.0 {
            ((-price.log10()).ceil() + 3.0).clamp(6.0, 12.0) as usize
        } else {
            6
        };
        format!("${:.*}", decimals, price)
    }
}

impl Default for PhantomSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for PhantomSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Phantom
    }

    async fn lookup(
        &self,
        http: &dyn HttpClient,
        item: &TrackedItem,
        _ctx: &BatchContext,
    ) -> Result<RawPricePayload, FetchError> {
        let url = format!("{}/{}", PRICE_URL, item.identifier());
        let body = http.get(&url, &[("Accept", "application/json")]).await?;
        let token: TokenPrice = serde_json::from_str(&body)?;

        Ok(RawPricePayload {
            price: RawPrice::Major {
                amount: token.price,
                formatted: Some(Self::usd_text(token.price)),
            },
            list_price: None,
            currency: Some("USD".to_string()),
            listing: ListingDetails {
                link_url: Some(format!("https://solscan.io/token/{}", item.identifier())),
                extra_notes: vec![NoteLine {
                    label: CHANGE_24H,
                    value: Self::change_text(token.price_change_24h.unwrap_or(0.0)),
                }],
                ..ListingDetails::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::{Normalized, PriceNormalizer};
    use crate::infrastructure::testing::FakeHttpClient;

    const MINT: &str = "So11111111111111111111111111111111111111112";

    #[tokio::test]
    async fn test_lookup_reads_usd_price() {
        let http = FakeHttpClient::new().route(
            MINT,
            r#"{"price": 142.123456, "priceChange24h": -3.5, "lastUpdatedAt": "2024-03-05T10:00:00Z"}"#,
        );
        let source = PhantomSource::new();
        let item = TrackedItem::new(MINT, "sol", 150.0).unwrap();

        let payload = source.lookup(&http, &item, &BatchContext::default()).await.unwrap();
        assert_eq!(payload.currency.as_deref(), Some("USD"));
        assert_eq!(payload.listing.extra_notes[0].value, "↘ -3.50%");
        assert_eq!(
            payload.listing.link_url,
            Some(format!("https://solscan.io/token/{}", MINT))
        );

        let hint = source.display_hint(&item);
        match PriceNormalizer::normalize(&item, payload, &hint).unwrap() {
            Normalized::Priced(quote) => assert_eq!(quote.current_display_price, "$142.123456"),
            Normalized::Free => panic!("token price should not be free"),
        }
    }

    #[tokio::test]
    async fn test_tiny_prices_keep_significant_digits() {
        let http = FakeHttpClient::new().route(MINT, r#"{"price": 0.0000001234}"#);
        let item = TrackedItem::new(MINT, "sol", 0.0000002).unwrap();
        let source = PhantomSource::new();

        let payload = source.lookup(&http, &item, &BatchContext::default()).await.unwrap();
        match PriceNormalizer::normalize(&item, payload, &source.display_hint(&item)).unwrap() {
            Normalized::Priced(quote) => {
                assert_eq!(quote.current_display_price, "$0.0000001234");
                assert_eq!(quote.format_like(0.0000002), "$0.0000002000");
            }
            Normalized::Free => panic!("token price should not be free"),
        }
    }

    #[test]
    fn test_usd_text() {
        assert_eq!(PhantomSource::usd_text(142.123456), "$142.123456");
        assert_eq!(PhantomSource::usd_text(0.5), "$0.500000");
        assert_eq!(PhantomSource::usd_text(0.00012), "$0.0001200");
        assert_eq!(PhantomSource::usd_text(1e-15), "$0.000000000000");
    }

    #[test]
    fn test_change_text() {
        assert_eq!(PhantomSource::change_text(1.234), "↗ +1.23%");
        assert_eq!(PhantomSource::change_text(0.0), "→ 0.00%");
    }

    #[tokio::test]
    async fn test_missing_price_is_malformed() {
        let http = FakeHttpClient::new().route(MINT, r#"{"error": "unknown token"}"#);
        let item = TrackedItem::new(MINT, "sol", 1.0).unwrap();
        let result = PhantomSource::new()
            .lookup(&http, &item, &BatchContext::default())
            .await;
        assert!(matches!(result, Err(FetchError::Malformed(_))));
    }
}
