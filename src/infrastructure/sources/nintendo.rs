//! Nintendo eShop: one batch price request per region plus best-effort store page details

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

use crate::domain::item::TrackedItem;
use crate::domain::price::{ListingDetails, NoteLine, RawPrice, RawPricePayload};
use crate::infrastructure::HttpClient;
use crate::shared::errors::{FetchError, PipelineError};
use crate::shared::i18n::Catalog;
use crate::shared::types::SourceKind;

use super::{BatchContext, PriceSource, GAME_ID};

const PRICE_URL: &str = "https://api.ec.nintendo.com/v1/price";
const JP_STORE_URL: &str = "https://store-jp.nintendo.com/item/software/D";
const FAVICON: &str = "https://store-jp.nintendo.com/mobify/bundle/1763/static/img/head/favicon.ico";

/// The price endpoint rejects longer id lists; larger batches are split
pub const MAX_IDS_PER_REQUEST: usize = 10;

static COMPATIBLE_DEVICE: Catalog = &[
    ("en", "Compatible Device"),
    ("zh", "对应本体"),
    ("ja", "対応本体"),
    ("ko", "호환 기기"),
    ("de", "Kompatibles Gerät"),
    ("es", "Dispositivo Compatible"),
    ("fr", "Appareil compatible"),
    ("pt", "Dispositivo Compatível"),
    ("ru", "Совместимое устройство"),
];

static OG_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"property="og:title"\s+content="([^"]*)""#).expect("Invalid regex")
});
static OG_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"property="og:image"\s+content="([^"]*)""#).expect("Invalid regex")
});
static PLAYS_ON_SWITCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""productDetail\.playableHardNotice\.label":\[\{"type":\d+,"value":"Nintendo Switch"\}\]"#)
        .expect("Invalid regex")
});
static PLAYS_ON_SWITCH_2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""productDetail\.playableHardNotice\.label\.onlySuper":\[\{"type":\d+,"value":"Nintendo Switch 2"\}\]"#)
        .expect("Invalid regex")
});

#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(default)]
    prices: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct PriceEntry {
    sales_status: Option<String>,
    regular_price: Option<Amount>,
    discount_price: Option<Amount>,
}

#[derive(Debug, Deserialize)]
struct Amount {
    amount: Option<String>,
    currency: Option<String>,
    raw_value: String,
}

/// Fields scraped from a store page
#[derive(Debug, Default, PartialEq)]
struct StorePage {
    title: Option<String>,
    image: Option<String>,
    device: Option<&'static str>,
}

impl StorePage {
    fn parse(html: &str) -> Self {
        let capture = |re: &Regex| {
            re.captures(html)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .filter(|s| !s.is_empty())
        };

        let device = match (PLAYS_ON_SWITCH.is_match(html), PLAYS_ON_SWITCH_2.is_match(html)) {
            (true, true) => Some("Switch/Switch 2"),
            (false, true) => Some("Switch 2"),
            (true, false) => Some("Switch"),
            (false, false) => None,
        };

        Self {
            title: capture(&OG_TITLE),
            image: capture(&OG_IMAGE),
            device,
        }
    }
}

pub struct NintendoSource;

impl NintendoSource {
    pub fn new() -> Self {
        Self
    }

    /// Store ids carry an optional letter prefix (`D7001...`) the price API does not accept.
    fn title_id(item: &TrackedItem) -> &str {
        let id = item.identifier();
        match id.chars().next() {
            Some(c) if c.is_ascii_alphabetic() => &id[1..],
            _ => id,
        }
    }

    fn context_key(region: &str, title_id: &str) -> String {
        format!("{}:{}", region, title_id)
    }

    fn store_page_url(item: &TrackedItem) -> Option<String> {
        (item.region() == "jp").then(|| format!("{}{}", JP_STORE_URL, Self::title_id(item)))
    }

    async fn fetch_region(
        http: &dyn HttpClient,
        region: &str,
        ids: &[&str],
    ) -> Result<Vec<Value>, String> {
        let lang = if region == "jp" { "ja" } else { "en" };
        let url = format!(
            "{}?country={}&ids={}&lang={}",
            PRICE_URL,
            region.to_uppercase(),
            ids.join(","),
            lang
        );

        let body = http.get(&url, &[]).await.map_err(|e| e.to_string())?;
        let response: PriceResponse = serde_json::from_str(&body).map_err(|e| e.to_string())?;

        if response.prices.is_empty() {
            return Err(format!("no prices returned for {}", ids.join(",")));
        }
        Ok(response.prices)
    }
}

impl Default for NintendoSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for NintendoSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Nintendo
    }

    fn default_icon(&self) -> Option<&'static str> {
        Some(FAVICON)
    }

    fn item_label(&self) -> Catalog {
        GAME_ID
    }

    async fn prepare(
        &self,
        http: &dyn HttpClient,
        items: &[TrackedItem],
    ) -> Result<BatchContext, PipelineError> {
        let mut by_region: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for item in items {
            let ids = by_region.entry(item.region()).or_default();
            let id = Self::title_id(item);
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        let mut ctx = BatchContext::default();
        for (region, ids) in by_region {
            for chunk in ids.chunks(MAX_IDS_PER_REQUEST) {
                let prices = Self::fetch_region(http, region, chunk).await.map_err(|reason| {
                    PipelineError::UpstreamUnavailable {
                        source_name: self.kind().to_string(),
                        reason,
                    }
                })?;

                for entry in prices {
                    let title_id = match entry.get("title_id") {
                        Some(Value::String(s)) => s.clone(),
                        Some(Value::Number(n)) => n.to_string(),
                        _ => continue,
                    };
                    ctx.insert(Self::context_key(region, &title_id), entry);
                }
            }
        }

        debug!("Prefetched {} eShop price entries", ctx.len());
        Ok(ctx)
    }

    async fn lookup(
        &self,
        http: &dyn HttpClient,
        item: &TrackedItem,
        ctx: &BatchContext,
    ) -> Result<RawPricePayload, FetchError> {
        let title_id = Self::title_id(item);
        let raw = ctx
            .get(&Self::context_key(item.region(), title_id))
            .ok_or_else(|| FetchError::NotFound(item.identifier().to_string()))?;
        let entry: PriceEntry = serde_json::from_value(raw.clone())?;

        if entry.sales_status.as_deref() == Some("not_found") {
            return Err(FetchError::NotFound(item.identifier().to_string()));
        }

        let current = entry
            .discount_price
            .or(entry.regular_price)
            .ok_or_else(|| FetchError::Malformed(format!("no price for {}", title_id)))?;
        let amount: f64 = current
            .raw_value
            .trim()
            .parse()
            .map_err(|_| FetchError::Malformed(format!("bad raw_value '{}'", current.raw_value)))?;

        let link_url = Self::store_page_url(item);
        let page = match &link_url {
            Some(url) => match http.get(url, &[]).await {
                Ok(html) => StorePage::parse(&html),
                Err(e) => {
                    debug!("Store page for {} unavailable: {}", title_id, e);
                    StorePage::default()
                }
            },
            None => StorePage::default(),
        };

        let extra_notes = page
            .device
            .map(|device| NoteLine {
                label: COMPATIBLE_DEVICE,
                value: device.to_string(),
            })
            .into_iter()
            .collect();

        Ok(RawPricePayload {
            price: RawPrice::Major {
                amount,
                formatted: current.amount,
            },
            list_price: None,
            currency: current.currency,
            listing: ListingDetails {
                name: page.title,
                link_url,
                cover_image: page.image,
                extra_notes,
                ..ListingDetails::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::FakeHttpClient;

    const PRICES: &str = r#"{"personalized": false, "country": "JP", "prices": [
        {"title_id": 70010000000001, "sales_status": "onsale",
         "regular_price": {"amount": "6,578円", "currency": "JPY", "raw_value": "6578"},
         "discount_price": {"amount": "3,289円", "currency": "JPY", "raw_value": "3289"}},
        {"title_id": 70010000000002, "sales_status": "onsale",
         "regular_price": {"amount": "2,000円", "currency": "JPY", "raw_value": "2000"}},
        {"title_id": 70010000000003, "sales_status": "not_found"}
    ]}"#;

    const STORE_PAGE: &str = r#"<html><head>
        <meta property="og:title" content="Mario Kart">
        <meta property="og:image" content="https://img/mk.jpg">
        </head><script>{"productDetail.playableHardNotice.label":[{"type":0,"value":"Nintendo Switch"}],
        "productDetail.playableHardNotice.label.onlySuper":[{"type":0,"value":"Nintendo Switch 2"}]}</script>"#;

    fn item(id: &str) -> TrackedItem {
        TrackedItem::new(id, "jp", 6578.0).unwrap()
    }

    #[test]
    fn test_letter_prefix_is_stripped() {
        assert_eq!(NintendoSource::title_id(&item("D70010000000001")), "70010000000001");
        assert_eq!(NintendoSource::title_id(&item("70010000000001")), "70010000000001");
    }

    #[test]
    fn test_store_page_parsing() {
        let page = StorePage::parse(STORE_PAGE);
        assert_eq!(page.title.as_deref(), Some("Mario Kart"));
        assert_eq!(page.image.as_deref(), Some("https://img/mk.jpg"));
        assert_eq!(page.device, Some("Switch/Switch 2"));

        assert_eq!(StorePage::parse("<html></html>"), StorePage::default());
    }

    #[tokio::test]
    async fn test_prepare_then_lookup() {
        let http = FakeHttpClient::new()
            .route("api.ec.nintendo.com", PRICES)
            .route("store-jp.nintendo.com/item/software/D70010000000001", STORE_PAGE);
        let source = NintendoSource::new();
        let items = vec![item("D70010000000001"), item("70010000000002"), item("70010000000003")];

        let ctx = source.prepare(&http, &items).await.unwrap();
        assert_eq!(ctx.len(), 3);
        assert_eq!(
            http.requests()[0],
            "https://api.ec.nintendo.com/v1/price?country=JP&ids=70010000000001,70010000000002,70010000000003&lang=ja"
        );

        let discounted = source.lookup(&http, &items[0], &ctx).await.unwrap();
        assert_eq!(
            discounted.price,
            RawPrice::Major { amount: 3289.0, formatted: Some("3,289円".to_string()) }
        );
        assert_eq!(discounted.listing.name.as_deref(), Some("Mario Kart"));
        assert_eq!(discounted.listing.extra_notes.len(), 1);
        assert_eq!(discounted.listing.extra_notes[0].value, "Switch/Switch 2");

        // page scrape fails with 404 from the fake; the price still comes through
        let regular = source.lookup(&http, &items[1], &ctx).await.unwrap();
        assert_eq!(
            regular.price,
            RawPrice::Major { amount: 2000.0, formatted: Some("2,000円".to_string()) }
        );
        assert_eq!(regular.listing.name, None);

        assert!(matches!(
            source.lookup(&http, &items[2], &ctx).await,
            Err(FetchError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_prices_abort_the_batch() {
        let http = FakeHttpClient::new().route("api.ec.nintendo.com", r#"{"prices": []}"#);
        let result = NintendoSource::new().prepare(&http, &[item("1")]).await;
        assert!(matches!(result, Err(PipelineError::UpstreamUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_network_failure_aborts_the_batch() {
        let http = FakeHttpClient::new().fail("api.ec.nintendo.com", FetchError::Transport("reset".into()));
        let result = NintendoSource::new().prepare(&http, &[item("1")]).await;
        assert_eq!(
            result.unwrap_err(),
            PipelineError::UpstreamUnavailable {
                source_name: "nintendo".to_string(),
                reason: "Network error: reset".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_regions_are_requested_separately() {
        let http = FakeHttpClient::new().route("api.ec.nintendo.com", PRICES);
        let items = vec![
            TrackedItem::new("70010000000001", "us", 60.0).unwrap(),
            item("70010000000001"),
        ];

        NintendoSource::new().prepare(&http, &items).await.unwrap();
        let requests = http.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].contains("country=JP"));
        assert!(requests[1].contains("country=US&ids=70010000000001&lang=en"));
    }

    #[tokio::test]
    async fn test_long_batches_are_split_per_request() {
        let tail = r#"{"prices": [{"title_id": 70010000000011, "sales_status": "onsale",
            "regular_price": {"amount": "1,000円", "currency": "JPY", "raw_value": "1000"}}]}"#;
        let http = FakeHttpClient::new()
            .route("ids=70010000000011,70010000000012&", tail)
            .route("api.ec.nintendo.com", PRICES);
        let items: Vec<_> = (1..=12).map(|n| item(&format!("700100000000{:02}", n))).collect();
        let source = NintendoSource::new();

        let ctx = source.prepare(&http, &items).await.unwrap();
        let requests = http.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].contains("ids=70010000000001,"));
        assert!(requests[0].contains(",70010000000010&lang=ja"));
        assert!(requests[1].contains("ids=70010000000011,70010000000012&lang=ja"));

        let eleventh = source.lookup(&http, &items[10], &ctx).await.unwrap();
        assert_eq!(
            eleventh.price,
            RawPrice::Major { amount: 1000.0, formatted: Some("1,000円".to_string()) }
        );
    }
}
