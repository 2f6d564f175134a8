//! One discount check of a configured source: parse, cache, fetch, evaluate, assemble

use chrono::{DateTime, FixedOffset};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::cache::{BatchOutcome, CacheKey, CacheManager, CachePolicy};
use crate::domain::discount::DiscountEvaluator;
use crate::domain::event::{EventAssembler, TimelineEvent};
use crate::domain::item::{ItemSpecParser, TrackedItem};
use crate::domain::price::{Normalized, PriceNormalizer};
use crate::infrastructure::{Clock, HttpClient, PriceSource};
use crate::shared::errors::{ConfigError, PipelineError};
use crate::shared::i18n::Localizer;
use crate::shared::types::SourceSettings;

use super::PriceFetcher;

pub struct DiscountMonitor {
    http: Arc<dyn HttpClient>,
    cache: CacheManager,
    localizer: Arc<dyn Localizer>,
    clock: Arc<dyn Clock>,
}

impl DiscountMonitor {
    pub fn new(
        http: Arc<dyn HttpClient>,
        cache: CacheManager,
        localizer: Arc<dyn Localizer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http,
            cache,
            localizer,
            clock,
        }
    }

    pub fn localizer(&self) -> &dyn Localizer {
        self.localizer.as_ref()
    }

    /// Discount events for today. Served from cache while a live entry exists;
    /// otherwise the source is queried and the result stored per its policy.
    pub async fn fetch_events(
        &self,
        source: &dyn PriceSource,
        settings: &SourceSettings,
    ) -> Result<Vec<TimelineEvent>, PipelineError> {
        settings.validate()?;
        if settings.account.is_some() && !source.supports_accounts() {
            return Err(ConfigError::InvalidValue {
                field: "account".to_string(),
                reason: format!("{} has no wishlist support", source.kind()),
            }
            .into());
        }

        // with an account the item list may be empty, never unparseable
        let items = ItemSpecParser::parse(&settings.items);
        if items.is_empty() && !settings.items.trim().is_empty() {
            return Err(ConfigError::NoValidItems(settings.items.clone()).into());
        }

        let now = self.clock.now();
        let scope = match settings.account.as_deref() {
            Some(account) => format!(
                "{}:{}:{}",
                source.kind(),
                account.trim(),
                settings.region.trim().to_lowercase()
            ),
            None => source.kind().to_string(),
        };
        let key = CacheKey::compute(&scope, &items, &now);
        let policy = CachePolicy {
            ttl_minutes: settings.cache_ttl_minutes,
            cache_empty: settings.cache_empty,
        };

        self.cache
            .read_through(&key, now, policy, || {
                self.run_batch(source, settings, &items, now)
            })
            .await
    }

    async fn run_batch(
        &self,
        source: &dyn PriceSource,
        settings: &SourceSettings,
        items: &[TrackedItem],
        now: DateTime<FixedOffset>,
    ) -> Result<BatchOutcome, PipelineError> {
        let mut items = items.to_vec();
        if let Some(account) = settings.account.as_deref() {
            items.extend(source.discover(self.http.as_ref(), account, &settings.region).await?);
        }

        let fetcher = PriceFetcher::new(settings.pacing(), settings.max_items);
        let batch = fetcher.limit(&items);
        if batch.is_empty() {
            info!("No {} items to check", source.kind());
            return Ok(BatchOutcome::confirmed(Vec::new()));
        }

        info!("Checking {} {} items", batch.len(), source.kind());

        let ctx = source.prepare(self.http.as_ref(), batch).await?;
        let fetched = fetcher
            .fetch_all(source, self.http.as_ref(), batch, &ctx)
            .await;
        let answered = fetched.len();

        let assembler = EventAssembler::new(self.localizer.as_ref(), now, source.default_icon())
            .with_item_label(source.item_label());
        let mut events = Vec::new();

        for (item, payload) in fetched {
            let hint = source.display_hint(&item);
            let quote = match PriceNormalizer::normalize(&item, payload, &hint) {
                Ok(Normalized::Priced(quote)) => quote,
                Ok(Normalized::Free) => {
                    debug!("{} is free in {}, skipping", item.identifier(), item.region());
                    continue;
                }
                Err(e) => {
                    warn!("Unusable price for {}: {}", item.identifier(), e);
                    continue;
                }
            };

            if let Some(record) = DiscountEvaluator::evaluate(&item, &quote) {
                debug!(
                    "{} down {}% ({})",
                    item.identifier(),
                    record.discount_percent,
                    quote.current_display_price
                );
                events.push(assembler.assemble(&record));
            }
        }

        info!(
            "{}/{} {} lookups answered, {} discounted",
            answered,
            batch.len(),
            source.kind(),
            events.len()
        );
        Ok(BatchOutcome {
            events,
            confirmed: answered > 0,
        })
    }
}
