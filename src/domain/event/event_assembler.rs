//! Mapping of discount records onto timeline events

use chrono::{DateTime, FixedOffset};
use rand::seq::SliceRandom;

use crate::domain::discount::DiscountRecord;
use crate::domain::price::ListingDetails;
use crate::shared::i18n::{Catalog, Localizer};
use crate::shared::utils::start_of_day;

use super::TimelineEvent;

static ORIGINAL_PRICE: Catalog = &[
    ("en", "Original Price"),
    ("zh", "原价"),
    ("ja", "元の価格"),
    ("ko", "원가"),
    ("de", "Originalpreis"),
    ("es", "Precio Original"),
    ("fr", "Prix d'origine"),
    ("pt", "Preço Original"),
    ("ru", "Исходная цена"),
];

static CURRENT_PRICE: Catalog = &[
    ("en", "Current Price"),
    ("zh", "现价"),
    ("ja", "現在の価格"),
    ("ko", "현재 가격"),
    ("de", "Aktueller Preis"),
    ("es", "Precio Actual"),
    ("fr", "Prix actuel"),
    ("pt", "Preço Atual"),
    ("ru", "Текущая цена"),
];

static DISCOUNT: Catalog = &[
    ("en", "Discount"),
    ("zh", "折扣"),
    ("ja", "割引"),
    ("ko", "할인"),
    ("de", "Rabatt"),
    ("es", "Descuento"),
    ("fr", "Réduction"),
    ("pt", "Desconto"),
    ("ru", "Скидка"),
];

static REGION: Catalog = &[
    ("en", "Region"),
    ("zh", "区域"),
    ("ja", "地域"),
    ("ko", "지역"),
    ("de", "Region"),
    ("es", "Región"),
    ("fr", "Région"),
    ("pt", "Região"),
    ("ru", "Регион"),
];

/// Generic label of the fallback title, for sources without one of their own
pub static ITEM_ID: Catalog = &[
    ("en", "Item ID"),
    ("zh", "商品 ID"),
    ("ja", "アイテム ID"),
    ("ko", "항목 ID"),
    ("de", "Artikel-ID"),
    ("es", "ID del artículo"),
    ("fr", "ID de l'article"),
    ("pt", "ID do item"),
    ("ru", "ID товара"),
];

/// Builds the events of one batch. Every event is dated to the start of the batch's local day.
pub struct EventAssembler<'a> {
    localizer: &'a dyn Localizer,
    day_start: DateTime<FixedOffset>,
    default_icon: Option<&'a str>,
    item_label: Catalog,
}

impl<'a> EventAssembler<'a> {
    pub fn new(
        localizer: &'a dyn Localizer,
        now: DateTime<FixedOffset>,
        default_icon: Option<&'a str>,
    ) -> Self {
        Self {
            localizer,
            day_start: start_of_day(&now),
            default_icon,
            item_label: ITEM_ID,
        }
    }

    /// Label used in `"<label>: <id>"` titles when the listing carries no name.
    pub fn with_item_label(mut self, item_label: Catalog) -> Self {
        self.item_label = item_label;
        self
    }

    pub fn assemble(&self, record: &DiscountRecord) -> TimelineEvent {
        let listing = &record.quote.listing;
        let name = listing
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| {
                format!("{}: {}", self.localizer.localize(self.item_label), record.item.identifier())
            });

        TimelineEvent {
            title: format!("{} (-{}%)", name, record.discount_percent),
            start_timestamp: self.day_start,
            end_timestamp: self.day_start,
            color: record.severity_tier.color().to_string(),
            notes: self.notes(record),
            icon_url: Self::pick_icon(listing).or_else(|| self.default_icon.map(str::to_string)),
            image_url: Self::pick_image(listing),
            link_url: listing.link_url.clone(),
            is_all_day: true,
            is_point_in_time: true,
        }
    }

    fn notes(&self, record: &DiscountRecord) -> String {
        let quote = &record.quote;
        let original = match (record.item.reference_price(), &quote.list_display_price) {
            (None, Some(list)) => list.clone(),
            _ => quote.format_like(record.reference_price),
        };

        let mut lines = vec![
            format!("{}: {}", self.localizer.localize(ORIGINAL_PRICE), original),
            format!("{}: {}", self.localizer.localize(CURRENT_PRICE), quote.current_display_price),
            format!("{}: -{}%", self.localizer.localize(DISCOUNT), record.discount_percent),
            format!("{}: {}", self.localizer.localize(REGION), record.item.region().to_uppercase()),
        ];

        lines.extend(
            quote
                .listing
                .extra_notes
                .iter()
                .map(|line| format!("{}: {}", self.localizer.localize(line.label), line.value)),
        );

        lines.join("\n")
    }

    /// Random screenshot, then the cover, then the largest icon.
    fn pick_image(listing: &ListingDetails) -> Option<String> {
        listing
            .screenshots
            .choose(&mut rand::thread_rng())
            .cloned()
            .or_else(|| listing.cover_image.clone())
            .or_else(|| {
                listing
                    .icons
                    .iter()
                    .max_by_key(|icon| icon.size_px)
                    .map(|icon| icon.url.clone())
            })
    }

    /// Smallest icon variant available.
    fn pick_icon(listing: &ListingDetails) -> Option<String> {
        listing
            .icons
            .iter()
            .min_by_key(|icon| icon.size_px)
            .map(|icon| icon.url.clone())
    }
}
