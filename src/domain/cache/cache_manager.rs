//! Read-through caching with one in-flight producer per key

use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::domain::event::TimelineEvent;

use super::{CacheEntry, CacheStore};

/// How a source's results are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl_minutes: u32,
    /// Also store an empty result, suppressing refetches until expiry
    pub cache_empty: bool,
}

/// What a producer hands back to `read_through`
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub events: Vec<TimelineEvent>,
    /// At least one upstream lookup answered, or there was nothing to look up.
    /// An empty outcome that is not confirmed is never stored.
    pub confirmed: bool,
}

impl BatchOutcome {
    pub fn confirmed(events: Vec<TimelineEvent>) -> Self {
        Self {
            events,
            confirmed: true,
        }
    }

    pub fn unconfirmed(events: Vec<TimelineEvent>) -> Self {
        Self {
            events,
            confirmed: false,
        }
    }
}

pub struct CacheManager {
    store: Arc<dyn CacheStore>,
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl CacheManager {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the live entry for `key`, or runs `producer` and stores its output.
    /// Concurrent callers with the same key wait for the first one and then read its entry.
    pub async fn read_through<F, Fut, E>(
        &self,
        key: &str,
        now: DateTime<FixedOffset>,
        policy: CachePolicy,
        producer: F,
    ) -> Result<Vec<TimelineEvent>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<BatchOutcome, E>>,
    {
        let guard = self.key_guard(key);
        let result = {
            let _permit = guard.lock().await;

            if let Some(payload) = self.lookup(key, &now).await {
                Ok(payload)
            } else {
                match producer().await {
                    Ok(outcome) => {
                        self.store_result(key, now, policy, &outcome).await;
                        Ok(outcome.events)
                    }
                    Err(e) => Err(e),
                }
            }
        };

        self.release_guard(key, guard);
        result
    }

    async fn lookup(&self, key: &str, now: &DateTime<FixedOffset>) -> Option<Vec<TimelineEvent>> {
        match self.store.get(key).await {
            Ok(Some(entry)) if entry.key == key && !entry.is_expired(now) => {
                debug!("Cache hit for {} ({} events)", key, entry.payload.len());
                Some(entry.payload)
            }
            Ok(Some(_)) => {
                debug!("Cache entry for {} is stale", key);
                None
            }
            Ok(None) => {
                debug!("Cache miss for {}", key);
                None
            }
            Err(e) => {
                warn!("Cache read failed for {}, treating as miss: {}", key, e);
                None
            }
        }
    }

    async fn store_result(
        &self,
        key: &str,
        now: DateTime<FixedOffset>,
        policy: CachePolicy,
        outcome: &BatchOutcome,
    ) {
        let events = &outcome.events;
        if events.is_empty() && !policy.cache_empty {
            debug!("Not caching empty result for {}", key);
            return;
        }
        if events.is_empty() && !outcome.confirmed {
            warn!("No lookup succeeded for {}, leaving it uncached", key);
            return;
        }

        let entry = CacheEntry::new(key, now, policy.ttl_minutes, events.to_vec());
        match self.store.set(entry).await {
            Ok(()) => info!(
                "Cached {} events under {} for {} minutes",
                events.len(),
                key,
                policy.ttl_minutes
            ),
            Err(e) => warn!("Cache write failed for {}: {}", key, e),
        }
    }

    fn key_guard(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    fn release_guard(&self, key: &str, guard: Arc<tokio::sync::Mutex<()>>) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        drop(guard);
        // only the map still holds it: nobody else is waiting
        if in_flight.get(key).is_some_and(|g| Arc::strong_count(g) == 1) {
            in_flight.remove(key);
        }
    }
}
