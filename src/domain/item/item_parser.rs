//! Parsing of the `id_region_price,id_region_price` item syntax

use tracing::debug;

use super::TrackedItem;

const ENTRY_SEPARATOR: char = ',';
const FIELD_SEPARATOR: char = '_';

/// Turns the user's item string into tracked items.
pub struct ItemSpecParser;

impl ItemSpecParser {
    /// Malformed entries are dropped, never reported. Duplicates are kept in order.
    pub fn parse(raw: &str) -> Vec<TrackedItem> {
        raw.split(ENTRY_SEPARATOR)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| {
                let item = Self::parse_entry(entry);
                if item.is_none() {
                    debug!("Dropping malformed item entry '{}'", entry);
                }
                item
            })
            .collect()
    }

    fn parse_entry(entry: &str) -> Option<TrackedItem> {
        let fields: Vec<&str> = entry.split(FIELD_SEPARATOR).map(str::trim).collect();
        let [identifier, region, price] = fields.as_slice() else {
            return None;
        };

        let reference_price = price.parse::<f64>().ok()?;
        TrackedItem::new(identifier, region, reference_price)
    }
}
