use anyhow::{bail, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::application::DiscountMonitor;
use crate::config::Config;
use crate::domain::cache::{CacheManager, CacheStore};
use crate::domain::event::TimelineEvent;
use crate::infrastructure::{
    create_source, JsonFileCacheStore, MemoryCacheStore, ReqwestHttpClient, SystemClock,
};
use crate::shared::i18n::{StaticLocalizer, DEFAULT_LANGUAGE};
use crate::shared::types::{SourceKind, SourceSettings};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str = concat!("pricewatch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub language: String,
    /// `None` keeps the cache in memory for this run only
    pub cache_path: Option<PathBuf>,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub sources: Vec<SourceSettings>,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            cache_path: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sources: Vec::new(),
        }
    }
}

impl AppCfg {
    pub fn from_config(cfg: Config) -> Self {
        let defaults = Self::default();
        Self {
            language: cfg.general.language.unwrap_or(defaults.language),
            cache_path: cfg.general.cache_path.map(PathBuf::from),
            request_timeout: cfg
                .general
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            user_agent: cfg.general.user_agent.unwrap_or(defaults.user_agent),
            sources: cfg.sources.into_iter().map(|s| s.into_settings()).collect(),
        }
    }

    /// Restrict the run to one source kind. With `items`, that source's items are replaced,
    /// or a source with default tunables is added when the config has none of that kind.
    pub fn select_source(&mut self, kind: SourceKind, items: Option<String>) {
        self.sources.retain(|s| s.kind == kind);
        match items {
            Some(items) if self.sources.is_empty() => {
                self.sources.push(SourceSettings::for_kind(kind, items));
            }
            Some(items) => {
                for source in &mut self.sources {
                    source.items = items.clone();
                }
            }
            None => {}
        }
    }

    /// Check `account`'s wishlist on the selected source, adding that source if needed.
    pub fn set_account(&mut self, kind: SourceKind, account: String, region: Option<String>) {
        if self.sources.is_empty() {
            self.sources.push(SourceSettings::for_kind(kind, ""));
        }
        for source in &mut self.sources {
            source.account = Some(account.clone());
            if let Some(region) = &region {
                source.region = region.clone();
            }
        }
    }

    pub fn set_cache_empty(&mut self, cache_empty: bool) {
        for source in &mut self.sources {
            source.cache_empty = cache_empty;
        }
    }
}

/// Outcome of one configured source, as printed on stdout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub source: SourceKind,
    pub events: Vec<TimelineEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceReport {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Check every source once, in configured order. A failing source never stops the others.
pub async fn run_sources(monitor: &DiscountMonitor, sources: &[SourceSettings]) -> Vec<SourceReport> {
    let mut reports = Vec::with_capacity(sources.len());

    for settings in sources {
        let source = create_source(settings.kind);
        let report = match monitor.fetch_events(source.as_ref(), settings).await {
            Ok(events) => SourceReport {
                source: settings.kind,
                events,
                error: None,
            },
            Err(e) => {
                error!("{} check failed: {}", settings.kind, e);
                SourceReport {
                    source: settings.kind,
                    events: Vec::new(),
                    error: Some(e.localized(monitor.localizer())),
                }
            }
        };
        reports.push(report);
    }

    reports
}

pub async fn run(cfg: AppCfg) -> Result<()> {
    if cfg.sources.is_empty() {
        bail!("no sources configured; pass --config or --source with --items");
    }

    let http = ReqwestHttpClient::new(cfg.request_timeout, &cfg.user_agent)?;
    let store: Arc<dyn CacheStore> = match &cfg.cache_path {
        Some(path) => {
            info!("Using cache file {}", path.display());
            Arc::new(JsonFileCacheStore::new(path))
        }
        None => Arc::new(MemoryCacheStore::new()),
    };

    let monitor = DiscountMonitor::new(
        Arc::new(http),
        CacheManager::new(store),
        Arc::new(StaticLocalizer::new(cfg.language.as_str())),
        Arc::new(SystemClock),
    );

    let reports = run_sources(&monitor, &cfg.sources).await;
    println!("{}", serde_json::to_string_pretty(&reports)?);

    for report in reports.iter().filter(|r| r.failed()) {
        if let Some(message) = &report.error {
            eprintln!("{}: {}", report.source, message);
        }
    }

    if reports.iter().all(SourceReport::failed) {
        bail!("every configured source failed");
    }
    Ok(())
}
