//! Sequential, paced per-item lookups with failure isolation

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::item::TrackedItem;
use crate::domain::price::RawPricePayload;
use crate::infrastructure::{BatchContext, HttpClient, Pacer, PriceSource};

pub struct PriceFetcher {
    pacing: Duration,
    max_items: usize,
}

impl PriceFetcher {
    pub fn new(pacing: Duration, max_items: usize) -> Self {
        Self { pacing, max_items }
    }

    /// Items actually looked up in one batch: the first `max_items`, in configured order.
    pub fn limit<'a>(&self, items: &'a [TrackedItem]) -> &'a [TrackedItem] {
        if items.len() > self.max_items {
            info!(
                "Batch holds {} items, only the first {} are checked",
                items.len(),
                self.max_items
            );
        }
        &items[..items.len().min(self.max_items)]
    }

    /// One lookup per item, never overlapping and at least `pacing` apart.
    /// Failed items are logged and left out; the rest keep their order.
    /// `items` is expected to be capped by `limit` already.
    pub async fn fetch_all(
        &self,
        source: &dyn PriceSource,
        http: &dyn HttpClient,
        items: &[TrackedItem],
        ctx: &BatchContext,
    ) -> Vec<(TrackedItem, RawPricePayload)> {
        let mut pacer = Pacer::new(self.pacing);
        let mut fetched = Vec::with_capacity(items.len());

        for item in items {
            pacer.ready().await;
            let result = source.lookup(http, item, ctx).await;
            pacer.complete();

            match result {
                Ok(payload) => fetched.push((item.clone(), payload)),
                Err(e) => warn!(
                    "{} lookup failed for {} ({}): {}",
                    source.kind(),
                    item.identifier(),
                    item.region(),
                    e
                ),
            }
        }

        debug!("Fetched {}/{} {} prices", fetched.len(), items.len(), source.kind());
        fetched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::{ListingDetails, RawPrice};
    use crate::infrastructure::testing::FakeHttpClient;
    use crate::shared::errors::FetchError;
    use crate::shared::types::SourceKind;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers from the item id: ids starting with `x` fail
    struct ScriptedSource {
        calls: Mutex<Vec<(String, tokio::time::Instant)>>,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self { calls: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl PriceSource for ScriptedSource {
        fn kind(&self) -> SourceKind {
            SourceKind::AppStore
        }

        async fn lookup(
            &self,
            _http: &dyn HttpClient,
            item: &TrackedItem,
            _ctx: &BatchContext,
        ) -> Result<RawPricePayload, FetchError> {
            self.calls
                .lock()
                .unwrap()
                .push((item.identifier().to_string(), tokio::time::Instant::now()));

            if item.identifier().starts_with('x') {
                return Err(FetchError::Status(503));
            }
            Ok(RawPricePayload {
                price: RawPrice::Major { amount: 1.0, formatted: None },
                list_price: None,
                currency: None,
                listing: ListingDetails::default(),
            })
        }
    }

    fn items(ids: &[&str]) -> Vec<TrackedItem> {
        ids.iter()
            .map(|id| TrackedItem::new(id, "us", 2.0).unwrap())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_skipped_in_order() {
        let source = ScriptedSource::new();
        let fetcher = PriceFetcher::new(Duration::from_millis(100), 50);

        let fetched = fetcher
            .fetch_all(&source, &FakeHttpClient::new(), &items(&["a", "x1", "b"]), &BatchContext::default())
            .await;

        let ids: Vec<_> = fetched.iter().map(|(item, _)| item.identifier()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(source.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookups_are_paced() {
        let source = ScriptedSource::new();
        let fetcher = PriceFetcher::new(Duration::from_millis(100), 50);

        fetcher
            .fetch_all(&source, &FakeHttpClient::new(), &items(&["a", "b", "c"]), &BatchContext::default())
            .await;

        let calls = source.calls.lock().unwrap();
        for pair in calls.windows(2) {
            assert!(pair[1].1 - pair[0].1 >= Duration::from_millis(100));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_is_capped() {
        let source = ScriptedSource::new();
        let fetcher = PriceFetcher::new(Duration::ZERO, 2);
        let all = items(&["a", "b", "c", "d"]);

        let batch = fetcher.limit(&all);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].identifier(), "b");
        assert_eq!(fetcher.limit(batch).len(), 2);

        let fetched = fetcher
            .fetch_all(&source, &FakeHttpClient::new(), batch, &BatchContext::default())
            .await;
        assert_eq!(fetched.len(), 2);
        assert_eq!(source.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicates_are_each_fetched() {
        let source = ScriptedSource::new();
        let fetcher = PriceFetcher::new(Duration::ZERO, 50);

        let fetched = fetcher
            .fetch_all(&source, &FakeHttpClient::new(), &items(&["a", "a"]), &BatchContext::default())
            .await;
        assert_eq!(fetched.len(), 2);
    }
}
