//! Cache domain - day-bucketed result caching

mod cache_key;
mod cache_manager;

pub use cache_key::CacheKey;
pub use cache_manager::{BatchOutcome, CacheManager, CachePolicy};

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::event::TimelineEvent;
use crate::shared::errors::CacheError;

/// Stored result of one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub created_at: DateTime<FixedOffset>,
    pub expires_at: DateTime<FixedOffset>,
    pub payload: Vec<TimelineEvent>,
}

impl CacheEntry {
    pub fn new(
        key: impl Into<String>,
        now: DateTime<FixedOffset>,
        ttl_minutes: u32,
        payload: Vec<TimelineEvent>,
    ) -> Self {
        Self {
            key: key.into(),
            created_at: now,
            expires_at: now + Duration::minutes(i64::from(ttl_minutes)),
            payload,
        }
    }

    pub fn is_expired(&self, now: &DateTime<FixedOffset>) -> bool {
        *now >= self.expires_at
    }
}

/// Key-value storage for cache entries
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    async fn set(&self, entry: CacheEntry) -> Result<(), CacheError>;
}
