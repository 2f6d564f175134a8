//! Steam store via the appdetails endpoint

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::domain::item::TrackedItem;
use crate::domain::price::{ListingDetails, RawPrice, RawPricePayload};
use crate::infrastructure::HttpClient;
use crate::shared::errors::{FetchError, PipelineError};
use crate::shared::i18n::Catalog;
use crate::shared::types::SourceKind;

use super::{BatchContext, PriceSource, GAME_ID};

const APPDETAILS_URL: &str = "https://store.steampowered.com/api/appdetails";
const PROFILE_URL: &str = "https://steamcommunity.com/id";
const WISHLIST_URL: &str = "https://api.steampowered.com/IWishlistService/GetWishlist/v1";
const FAVICON: &str = "https://store.steampowered.com/favicon.ico";

/// Steam reports every currency in hundredths
const MINOR_UNIT_EXPONENT: u32 = 2;

/// Wishlist entries beyond this are ignored
pub const WISHLIST_LIMIT: usize = 50;

static STEAM_ID64: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<steamID64>(\d+)</steamID64>").expect("Invalid regex"));

#[derive(Debug, Deserialize)]
struct WishlistResponse {
    #[serde(default)]
    response: WishlistBody,
}

#[derive(Debug, Default, Deserialize)]
struct WishlistBody {
    #[serde(default)]
    items: Vec<WishlistItem>,
}

#[derive(Debug, Deserialize)]
struct WishlistItem {
    appid: u64,
}

#[derive(Debug, Deserialize)]
struct AppDetailsEntry {
    success: bool,
    data: Option<AppData>,
}

#[derive(Debug, Deserialize)]
struct AppData {
    name: Option<String>,
    #[serde(default)]
    is_free: bool,
    header_image: Option<String>,
    price_overview: Option<PriceOverview>,
}

#[derive(Debug, Deserialize)]
struct PriceOverview {
    currency: Option<String>,
    #[serde(rename = "final")]
    final_price: i64,
    final_formatted: Option<String>,
    initial: Option<i64>,
    initial_formatted: Option<String>,
    #[serde(default)]
    discount_percent: u8,
}

impl PriceOverview {
    /// Pre-discount price: `initial` when sent, else derived from `discount_percent`.
    fn list_price(&self) -> Option<RawPrice> {
        match self.initial {
            Some(initial) if initial > self.final_price => Some(RawPrice::Minor {
                amount: initial,
                exponent: MINOR_UNIT_EXPONENT,
                formatted: self.initial_formatted.clone(),
            }),
            Some(_) => None,
            None if (1..100).contains(&self.discount_percent) => Some(RawPrice::Major {
                amount: self.final_price as f64
                    / 10f64.powi(MINOR_UNIT_EXPONENT as i32)
                    / (1.0 - f64::from(self.discount_percent) / 100.0),
                formatted: None,
            }),
            None => None,
        }
    }
}

pub struct SteamSource;

impl SteamSource {
    pub fn new() -> Self {
        Self
    }

    fn unavailable(reason: impl Into<String>) -> PipelineError {
        PipelineError::UpstreamUnavailable {
            source_name: SourceKind::Steam.to_string(),
            reason: reason.into(),
        }
    }

    /// Numeric SteamID64s are used as is; vanity names go through the community profile.
    async fn resolve_account(http: &dyn HttpClient, account: &str) -> Result<String, PipelineError> {
        let account = account.trim();
        if account.len() == 17 && account.chars().all(|c| c.is_ascii_digit()) {
            return Ok(account.to_string());
        }

        let url = format!("{}/{}?xml=1", PROFILE_URL, account);
        let xml = http
            .get(&url, &[])
            .await
            .map_err(|e| Self::unavailable(format!("profile {}: {}", account, e)))?;

        STEAM_ID64
            .captures(&xml)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| Self::unavailable(format!("no SteamID64 for {}", account)))
    }
}

impl Default for SteamSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for SteamSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Steam
    }

    fn default_icon(&self) -> Option<&'static str> {
        Some(FAVICON)
    }

    fn item_label(&self) -> Catalog {
        GAME_ID
    }

    fn supports_accounts(&self) -> bool {
        true
    }

    async fn discover(
        &self,
        http: &dyn HttpClient,
        account: &str,
        region: &str,
    ) -> Result<Vec<TrackedItem>, PipelineError> {
        let steam_id = Self::resolve_account(http, account).await?;
        debug!("Steam account {} is {}", account, steam_id);

        let url = format!("{}?steamid={}", WISHLIST_URL, steam_id);
        let body = http
            .get(&url, &[])
            .await
            .map_err(|e| Self::unavailable(format!("wishlist of {}: {}", account, e)))?;
        let wishlist: WishlistResponse = serde_json::from_str(&body)
            .map_err(|e| Self::unavailable(format!("wishlist of {}: {}", account, e)))?;

        let items: Vec<TrackedItem> = wishlist
            .response
            .items
            .iter()
            .take(WISHLIST_LIMIT)
            .filter_map(|entry| TrackedItem::discovered(&entry.appid.to_string(), region))
            .collect();

        info!(
            "Wishlist of {} holds {} games, checking {}",
            account,
            wishlist.response.items.len(),
            items.len()
        );
        Ok(items)
    }

    async fn lookup(
        &self,
        http: &dyn HttpClient,
        item: &TrackedItem,
        _ctx: &BatchContext,
    ) -> Result<RawPricePayload, FetchError> {
        let url = format!(
            "{}?appids={}&cc={}&filters=price_overview,basic",
            APPDETAILS_URL,
            item.identifier(),
            item.region()
        );
        let body = http.get(&url, &[]).await?;
        let mut response: HashMap<String, AppDetailsEntry> = serde_json::from_str(&body)?;

        let data = response
            .remove(item.identifier())
            .filter(|entry| entry.success)
            .and_then(|entry| entry.data)
            .ok_or_else(|| FetchError::NotFound(item.identifier().to_string()))?;

        let (price, list_price, currency) = match data.price_overview {
            Some(overview) => (
                RawPrice::Minor {
                    amount: overview.final_price,
                    exponent: MINOR_UNIT_EXPONENT,
                    formatted: overview.final_formatted.clone(),
                },
                overview.list_price(),
                overview.currency,
            ),
            None if data.is_free => (
                RawPrice::Minor { amount: 0, exponent: MINOR_UNIT_EXPONENT, formatted: None },
                None,
                None,
            ),
            None => {
                return Err(FetchError::NotFound(format!(
                    "{} has no price in {}",
                    item.identifier(),
                    item.region()
                )))
            }
        };

        Ok(RawPricePayload {
            price,
            list_price,
            currency,
            listing: ListingDetails {
                name: data.name,
                link_url: Some(format!(
                    "https://store.steampowered.com/app/{}",
                    item.identifier()
                )),
                cover_image: data.header_image,
                ..ListingDetails::default()
            },
        })
    }
}
