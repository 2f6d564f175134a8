//! Common types used across the application

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::shared::errors::ConfigError;

/// Longest cache lifetime allowed; must stay below one day.
pub const MAX_CACHE_TTL_MINUTES: u32 = 24 * 60 - 1;

/// Region assumed for wishlist items when none is configured
pub const DEFAULT_REGION: &str = "us";

/// Supported price sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    AppStore,
    Steam,
    Nintendo,
    Phantom,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::AppStore => "appstore",
            SourceKind::Steam => "steam",
            SourceKind::Nintendo => "nintendo",
            SourceKind::Phantom => "phantom",
        }
    }

    pub fn all() -> [SourceKind; 4] {
        [
            SourceKind::AppStore,
            SourceKind::Steam,
            SourceKind::Nintendo,
            SourceKind::Phantom,
        ]
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceKind::all()
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownSource(s.to_string()))
    }
}

/// Per-source run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    pub kind: SourceKind,
    /// Tracked item spec, `id_region_price` entries separated by commas
    pub items: String,
    pub cache_ttl_minutes: u32,
    /// Store a confirmed "no discounts" result too
    pub cache_empty: bool,
    pub max_items: usize,
    pub pacing_ms: u64,
    /// Account whose public wishlist adds items, for sources that can read one
    #[serde(default)]
    pub account: Option<String>,
    /// Store region of wishlist items
    pub region: String,
}

impl SourceSettings {
    /// Defaults observed for each vendor: Nintendo pages are slow so its results live longer
    /// and its batch price endpoint takes at most ten ids.
    pub fn for_kind(kind: SourceKind, items: impl Into<String>) -> Self {
        let (cache_ttl_minutes, cache_empty, max_items) = match kind {
            SourceKind::AppStore => (30, false, 50),
            SourceKind::Steam => (30, true, 50),
            SourceKind::Nintendo => (120, false, 10),
            SourceKind::Phantom => (10, false, 50),
        };

        Self {
            kind,
            items: items.into(),
            cache_ttl_minutes,
            cache_empty,
            max_items,
            pacing_ms: 100,
            account: None,
            region: DEFAULT_REGION.to_string(),
        }
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.account.as_deref() {
            Some(account) if account.trim().is_empty() => {
                return Err(ConfigError::MissingField("account".to_string()));
            }
            Some(_) if self.region.trim().is_empty() => {
                return Err(ConfigError::MissingField("region".to_string()));
            }
            Some(_) => {}
            None if self.items.trim().is_empty() => {
                return Err(ConfigError::MissingField("items".to_string()));
            }
            None => {}
        }
        if self.cache_ttl_minutes == 0 || self.cache_ttl_minutes > MAX_CACHE_TTL_MINUTES {
            return Err(ConfigError::InvalidTtl(self.cache_ttl_minutes));
        }
        if self.max_items == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_items".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
