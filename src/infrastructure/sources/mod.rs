//! Vendor price sources

pub mod appstore;
pub mod nintendo;
pub mod phantom;
pub mod steam;

pub use appstore::AppStoreSource;
pub use nintendo::NintendoSource;
pub use phantom::PhantomSource;
pub use steam::SteamSource;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use crate::domain::event::ITEM_ID;
use crate::domain::item::TrackedItem;
use crate::domain::price::RawPricePayload;
use crate::shared::errors::{FetchError, PipelineError};
use crate::shared::i18n::Catalog;
use crate::shared::types::SourceKind;

use super::HttpClient;

/// Data fetched once per batch and shared by the per-item lookups
#[derive(Debug, Clone, Default)]
pub struct BatchContext {
    prefetched: HashMap<String, Value>,
}

impl BatchContext {
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.prefetched.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.prefetched.get(key)
    }

    pub fn len(&self) -> usize {
        self.prefetched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefetched.is_empty()
    }
}

/// Fallback title label of the game stores
pub static GAME_ID: Catalog = &[
    ("en", "Game ID"),
    ("zh", "游戏 ID"),
    ("ja", "ゲーム ID"),
    ("ko", "게임 ID"),
    ("de", "Spiele-ID"),
    ("es", "ID del juego"),
    ("fr", "ID du jeu"),
    ("pt", "ID do jogo"),
    ("ru", "ID игры"),
];

/// One vendor's price lookup
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Icon used for events whose listing carries none
    fn default_icon(&self) -> Option<&'static str> {
        None
    }

    /// Label of `"<label>: <id>"` titles for listings without a name
    fn item_label(&self) -> Catalog {
        ITEM_ID
    }

    /// Sample formatted price for the item's region, used when the vendor sends a bare number
    fn display_hint(&self, item: &TrackedItem) -> String {
        regional_sample(item.region()).to_string()
    }

    /// Batch-level request issued before any per-item lookup.
    /// A failure here aborts the whole batch.
    async fn prepare(
        &self,
        _http: &dyn HttpClient,
        _items: &[TrackedItem],
    ) -> Result<BatchContext, PipelineError> {
        Ok(BatchContext::default())
    }

    /// Whether `discover` can read an account's wishlist
    fn supports_accounts(&self) -> bool {
        false
    }

    /// Items on the public wishlist of `account`, priced in `region`.
    /// Discovered items carry no reference price of their own.
    async fn discover(
        &self,
        _http: &dyn HttpClient,
        _account: &str,
        _region: &str,
    ) -> Result<Vec<TrackedItem>, PipelineError> {
        Ok(Vec::new())
    }

    async fn lookup(
        &self,
        http: &dyn HttpClient,
        item: &TrackedItem,
        ctx: &BatchContext,
    ) -> Result<RawPricePayload, FetchError>;
}

/// Create a price source for the given kind
pub fn create_source(kind: SourceKind) -> Box<dyn PriceSource> {
    match kind {
        SourceKind::AppStore => Box::new(AppStoreSource::new()),
        SourceKind::Steam => Box::new(SteamSource::new()),
        SourceKind::Nintendo => Box::new(NintendoSource::new()),
        SourceKind::Phantom => Box::new(PhantomSource::new()),
    }
}

/// Sample price written the way stores in a region display it
pub fn regional_sample(region: &str) -> &'static str {
    match region.to_ascii_lowercase().as_str() {
        "us" | "au" | "ca" | "nz" | "sg" | "mx" => "$1,000.00",
        "cn" => "¥1,000.00",
        "jp" => "¥1,000",
        "hk" => "HK$ 1,000.00",
        "tw" => "NT$ 1,000",
        "kr" => "₩1,000",
        "gb" | "uk" => "£1,000.00",
        "in" => "₹1,000.00",
        "de" | "fr" | "es" | "it" | "nl" | "at" | "be" | "fi" | "ie" | "pt" => "1.000,00 €",
        "ru" => "1 000,00 ₽",
        "br" => "R$ 1.000,00",
        "pl" => "1 000,00 zł",
        "ch" => "CHF 1'000.00",
        "tr" => "1.000,00 TL",
        _ => "1,000.00",
    }
}
