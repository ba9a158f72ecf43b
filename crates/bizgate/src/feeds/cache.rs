use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::domain::NewsItem;
use super::error::FeedError;

/// Time source for freshness checks, injectable so tests can move time by hand.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug)]
struct CacheEntry {
    items: Arc<Vec<NewsItem>>,
    fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    fn view(&self, stale: bool) -> CachedFeed {
        CachedFeed {
            items: Arc::clone(&self.items),
            fetched_at: self.fetched_at,
            stale,
        }
    }
}

/// Items handed out by the cache. `stale` marks a fallback after a failed refresh.
#[derive(Debug, Clone)]
pub struct CachedFeed {
    pub items: Arc<Vec<NewsItem>>,
    pub fetched_at: DateTime<Utc>,
    pub stale: bool,
}

/// Single-slot feed cache with stale-on-failure fallback.
///
/// Refreshes are single-flight: the refresh mutex serializes upstream fetches and guards the
/// failure of the latest attempt. A waiter that acquires the mutex after another attempt
/// finished reuses that outcome (fresh items, stale items or `FeedUnavailable`) instead of
/// fetching again. The slot itself is only locked for the instant it is read or replaced,
/// never across the fetch.
pub struct FeedCache {
    slot: RwLock<Option<CacheEntry>>,
    refresh: Mutex<Option<FeedError>>,
    attempts: AtomicU64,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: RwLock::new(None),
            refresh: Mutex::new(None),
            attempts: AtomicU64::new(0),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current entry regardless of age, without touching upstream.
    pub async fn snapshot(&self) -> Option<CachedFeed> {
        self.slot.read().await.as_ref().map(|entry| entry.view(false))
    }

    /// Return fresh items, refreshing through `fetcher` when the entry is missing or expired.
    pub async fn read_through<F, Fut>(&self, fetcher: F) -> Result<CachedFeed, FeedError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<NewsItem>, FeedError>>,
    {
        if let Some(fresh) = self.fresh_entry().await {
            return Ok(fresh);
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let mut last_failure = self.refresh.lock().await;
        if let Some(fresh) = self.fresh_entry().await {
            debug!("feed cache refreshed by a concurrent request");
            return Ok(fresh);
        }
        if self.attempts.load(Ordering::Acquire) != seen {
            match last_failure.as_ref() {
                Some(err) => {
                    debug!("reusing the failed outcome of a concurrent refresh");
                    return self.fall_back(err.clone()).await;
                }
                None => {
                    if let Some(entry) = self.snapshot().await {
                        return Ok(entry);
                    }
                }
            }
        }

        let outcome = fetcher().await;
        self.attempts.fetch_add(1, Ordering::AcqRel);

        match outcome {
            Ok(items) => {
                *last_failure = None;
                let mut slot = self.slot.write().await;
                let now = self.clock.now();
                let fetched_at = match slot.as_ref() {
                    Some(previous) if previous.fetched_at > now => previous.fetched_at,
                    _ => now,
                };
                let entry = CacheEntry {
                    items: Arc::new(items),
                    fetched_at,
                };
                let view = entry.view(false);
                *slot = Some(entry);
                info!(items = view.items.len(), "feed cache refreshed");
                Ok(view)
            }
            Err(err) => {
                *last_failure = Some(err.clone());
                self.fall_back(err).await
            }
        }
    }

    /// Stale entry when one exists, otherwise `FeedUnavailable` wrapping the refresh failure.
    async fn fall_back(&self, err: FeedError) -> Result<CachedFeed, FeedError> {
        match self.slot.read().await.as_ref() {
            Some(entry) => {
                warn!(error = %err, fetched_at = %entry.fetched_at, "feed refresh failed; serving stale cache");
                Ok(entry.view(true))
            }
            None => {
                warn!(error = %err, "feed refresh failed with nothing cached");
                Err(FeedError::FeedUnavailable {
                    source: Box::new(err),
                })
            }
        }
    }

    async fn fresh_entry(&self) -> Option<CachedFeed> {
        let slot = self.slot.read().await;
        let entry = slot.as_ref()?;
        let elapsed = (self.clock.now() - entry.fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        (elapsed < self.ttl).then(|| entry.view(false))
    }
}
