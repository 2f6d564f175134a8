use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::shared::types::{SourceKind, SourceSettings};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralCfg {
    pub language: Option<String>,
    pub cache_path: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

/// One `[[sources]]` table; omitted tunables fall back to the source's defaults
#[derive(Debug, Clone, Deserialize)]
pub struct SourceCfg {
    pub kind: SourceKind,
    #[serde(default)]
    pub items: String,
    pub cache_ttl_minutes: Option<u32>,
    pub cache_empty: Option<bool>,
    pub max_items: Option<usize>,
    pub pacing_ms: Option<u64>,
    /// Wishlist owner, for sources that can read one
    pub account: Option<String>,
    pub region: Option<String>,
}

impl SourceCfg {
    pub fn into_settings(self) -> SourceSettings {
        let defaults = SourceSettings::for_kind(self.kind, self.items);
        SourceSettings {
            cache_ttl_minutes: self.cache_ttl_minutes.unwrap_or(defaults.cache_ttl_minutes),
            cache_empty: self.cache_empty.unwrap_or(defaults.cache_empty),
            max_items: self.max_items.unwrap_or(defaults.max_items),
            pacing_ms: self.pacing_ms.unwrap_or(defaults.pacing_ms),
            account: self.account,
            region: self.region.unwrap_or(defaults.region),
            ..defaults
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralCfg,
    #[serde(default)]
    pub sources: Vec<SourceCfg>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read {}", path.as_ref().display()))?;
        Self::parse(&s)
    }

    pub fn parse(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parse pricewatch config")?;
        Ok(cfg)
    }
}
