//! Apple App Store via the public iTunes lookup API

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::item::TrackedItem;
use crate::domain::price::{IconAsset, ListingDetails, RawPrice, RawPricePayload};
use crate::infrastructure::HttpClient;
use crate::shared::errors::FetchError;
use crate::shared::types::SourceKind;

use super::{BatchContext, PriceSource};

const LOOKUP_URL: &str = "https://itunes.apple.com/lookup";

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<AppInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppInfo {
    track_name: Option<String>,
    track_view_url: Option<String>,
    price: Option<f64>,
    formatted_price: Option<String>,
    currency: Option<String>,
    #[serde(default)]
    screenshot_urls: Vec<String>,
    artwork_url60: Option<String>,
    artwork_url100: Option<String>,
    artwork_url512: Option<String>,
}

pub struct AppStoreSource;

impl AppStoreSource {
    pub fn new() -> Self {
        Self
    }

    fn to_payload(item: &TrackedItem, app: AppInfo) -> Result<RawPricePayload, FetchError> {
        let amount = app
            .price
            .ok_or_else(|| FetchError::Malformed(format!("no price for app {}", item.identifier())))?;

        let icons = [
            (60, app.artwork_url60),
            (100, app.artwork_url100),
            (512, app.artwork_url512),
        ]
        .into_iter()
        .filter_map(|(size_px, url)| url.map(|url| IconAsset { size_px, url }))
        .collect();

        Ok(RawPricePayload {
            price: RawPrice::Major {
                amount,
                formatted: app.formatted_price,
            },
            list_price: None,
            currency: app.currency,
            listing: ListingDetails {
                name: app.track_name,
                link_url: app.track_view_url,
                cover_image: None,
                screenshots: app.screenshot_urls,
                icons,
                extra_notes: Vec::new(),
            },
        })
    }
}

impl Default for AppStoreSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for AppStoreSource {
    fn kind(&self) -> SourceKind {
        SourceKind::AppStore
    }

    async fn lookup(
        &self,
        http: &dyn HttpClient,
        item: &TrackedItem,
        _ctx: &BatchContext,
    ) -> Result<RawPricePayload, FetchError> {
        let url = format!(
            "{}?id={}&country={}",
            LOOKUP_URL,
            item.identifier(),
            item.region()
        );
        let body = http.get(&url, &[]).await?;
        let response: LookupResponse = serde_json::from_str(&body)?;

        let app = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::NotFound(item.identifier().to_string()))?;

        Self::to_payload(item, app)
    }
}
