// Domain-keyed result cache with a TTL checked on read.
//
// Registration data changes slowly, so re-resolving the same domain on
// every navigation wastes time and hammers the upstream service. Entries
// expire after a TTL; expired entries read as misses and are swept on the
// next write, which keeps the map bounded by recently seen domains.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};
use tracing::debug;

use crate::model::AnalysisResult;

/// Concurrency-safe cache of per-domain analysis results.
///
/// Injected into the registry analyzer at construction; only successful
/// evaluations are written, so a transient resolver failure never pins a
/// degraded result.
pub struct RegistryCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    stored_at: Instant,
    result: AnalysisResult,
}

impl RegistryCache {
    /// A zero TTL disables caching entirely (every read misses).
    pub fn new(ttl: Duration) -> Self {
        RegistryCache {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// A hit returns the stored result unchanged. Expired entries read as
    /// misses.
    pub async fn get(&self, domain: &str) -> Option<AnalysisResult> {
        let entries = self.entries.read().await;
        let entry = entries.get(domain)?;
        if entry.stored_at.elapsed() < self.ttl {
            Some(entry.result.clone())
        } else {
            None
        }
    }

    /// Store a successful evaluation, sweeping expired entries while the
    /// write lock is held.
    pub async fn insert(&self, domain: String, result: AnalysisResult) {
        let mut entries = self.entries.write().await;
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        debug!(domain, "caching registry result");
        entries.insert(
            domain,
            CacheEntry {
                stored_at: Instant::now(),
                result,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{plugin, AnalysisResult, Metadata, Severity};

    fn sample_result(score: f64) -> AnalysisResult {
        AnalysisResult {
            plugin_id: plugin::WHOIS_CHECKER.to_string(),
            score,
            severity: Severity::Low,
            reasons: vec!["test".to_string()],
            metadata: Metadata::new(),
        }
    }

    #[tokio::test]
    async fn hit_returns_stored_result_unchanged() {
        let cache = RegistryCache::new(Duration::from_secs(60));
        let stored = sample_result(25.0);
        cache.insert("example.com".to_string(), stored.clone()).await;

        let hit = cache.get("example.com").await;
        assert_eq!(hit, Some(stored));
    }

    #[tokio::test]
    async fn unknown_domain_misses() {
        let cache = RegistryCache::new(Duration::from_secs(60));
        assert!(cache.get("example.com").await.is_none());
    }

    #[tokio::test]
    async fn zero_ttl_expires_immediately() {
        let cache = RegistryCache::new(Duration::ZERO);
        cache.insert("example.com".to_string(), sample_result(25.0)).await;
        assert!(cache.get("example.com").await.is_none());
    }

    #[tokio::test]
    async fn short_ttl_entry_expires_after_sleep() {
        let cache = RegistryCache::new(Duration::from_millis(40));
        cache.insert("example.com".to_string(), sample_result(25.0)).await;
        assert!(cache.get("example.com").await.is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get("example.com").await.is_none());
    }

    #[tokio::test]
    async fn insert_sweeps_expired_entries() {
        let cache = RegistryCache::new(Duration::from_millis(40));
        cache.insert("old.example".to_string(), sample_result(10.0)).await;
        tokio::time::sleep(Duration::from_millis(80)).await;

        cache.insert("new.example".to_string(), sample_result(20.0)).await;
        assert_eq!(cache.len().await, 1);
        assert!(cache.get("new.example").await.is_some());
    }
}
