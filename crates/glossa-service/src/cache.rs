//! Read-through cache with named regions and wholesale invalidation.
//!
//! Four regions front the store: point lookup by id, point lookup by
//! (key, locale), the distinct-locale listing, and export snapshots
//! keyed by locale-or-"all". A single write can change search results,
//! the locale listing, and several snapshots at once, so every committed
//! translation write clears all regions through one [`CacheLayer::evict_all`]
//! call rather than tracking per-entry dependencies. The regions share
//! one lock, so readers never observe a half-cleared cache.

use glossa_core::config::CacheConfig;
use glossa_core::model::Translation;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::export::ExportSnapshot;

/// A cached value stamped with its insertion time.
struct Entry<T> {
    value: T,
    inserted_at: Instant,
}

impl<T: Clone> Entry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    /// Clone the value if the entry is still within the TTL. A zero TTL
    /// disables expiry.
    fn value_if_fresh(&self, ttl: Duration) -> Option<T> {
        if ttl.is_zero() || self.inserted_at.elapsed() <= ttl {
            Some(self.value.clone())
        } else {
            None
        }
    }
}

/// Cache hit/miss counters across all regions.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    fn record<T>(&mut self, outcome: Option<T>) -> Option<T> {
        if outcome.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        outcome
    }
}

struct Regions {
    by_id: LruCache<String, Entry<Translation>>,
    by_key_locale: LruCache<(String, String), Entry<Translation>>,
    locales: Option<Entry<Vec<String>>>,
    export: LruCache<String, Entry<ExportSnapshot>>,
    stats: CacheStats,
}

/// Coarse-grained invalidating cache for catalog reads.
pub(crate) struct CacheLayer {
    regions: RwLock<Regions>,
    ttl: Duration,
}

impl CacheLayer {
    pub(crate) fn new(config: &CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            regions: RwLock::new(Regions {
                by_id: LruCache::new(capacity),
                by_key_locale: LruCache::new(capacity),
                locales: None,
                export: LruCache::new(capacity),
                stats: CacheStats::default(),
            }),
            ttl: Duration::from_secs(config.ttl_secs),
        }
    }

    pub(crate) async fn get_by_id(&self, id: &str) -> Option<Translation> {
        let mut regions = self.regions.write().await;
        let hit = regions
            .by_id
            .get(id)
            .and_then(|entry| entry.value_if_fresh(self.ttl));
        if hit.is_none() {
            regions.by_id.pop(id);
        }
        regions.stats.record(hit)
    }

    pub(crate) async fn put_by_id(&self, translation: &Translation) {
        let mut regions = self.regions.write().await;
        regions
            .by_id
            .put(translation.id.clone(), Entry::new(translation.clone()));
    }

    pub(crate) async fn get_by_key_locale(&self, key: &str, locale: &str) -> Option<Translation> {
        let mut regions = self.regions.write().await;
        let cache_key = (key.to_string(), locale.to_string());
        let hit = regions
            .by_key_locale
            .get(&cache_key)
            .and_then(|entry| entry.value_if_fresh(self.ttl));
        if hit.is_none() {
            regions.by_key_locale.pop(&cache_key);
        }
        regions.stats.record(hit)
    }

    pub(crate) async fn put_by_key_locale(&self, translation: &Translation) {
        let mut regions = self.regions.write().await;
        regions.by_key_locale.put(
            (translation.key.clone(), translation.locale.clone()),
            Entry::new(translation.clone()),
        );
    }

    pub(crate) async fn get_locales(&self) -> Option<Vec<String>> {
        let mut regions = self.regions.write().await;
        let hit = regions
            .locales
            .as_ref()
            .and_then(|entry| entry.value_if_fresh(self.ttl));
        if hit.is_none() {
            regions.locales = None;
        }
        regions.stats.record(hit)
    }

    pub(crate) async fn put_locales(&self, locales: Vec<String>) {
        let mut regions = self.regions.write().await;
        regions.locales = Some(Entry::new(locales));
    }

    pub(crate) async fn get_export(&self, scope: &str) -> Option<ExportSnapshot> {
        let mut regions = self.regions.write().await;
        let hit = regions
            .export
            .get(scope)
            .and_then(|entry| entry.value_if_fresh(self.ttl));
        if hit.is_none() {
            regions.export.pop(scope);
        }
        regions.stats.record(hit)
    }

    pub(crate) async fn put_export(&self, scope: &str, snapshot: &ExportSnapshot) {
        let mut regions = self.regions.write().await;
        regions
            .export
            .put(scope.to_string(), Entry::new(snapshot.clone()));
    }

    /// Clear every region. Called synchronously after each committed
    /// translation write; the single lock makes the clear atomic.
    pub(crate) async fn evict_all(&self) {
        let mut regions = self.regions.write().await;
        regions.by_id.clear();
        regions.by_key_locale.clear();
        regions.locales = None;
        regions.export.clear();
        debug!("cache: evicted all regions");
    }

    pub(crate) async fn stats(&self) -> CacheStats {
        self.regions.read().await.stats
    }
}
