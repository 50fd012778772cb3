use crate::model::{DrawRequest, ScraperError};
use crate::scraper::traits::Scraper;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Key → (value, expiry) map with a single time-to-live for every entry.
pub struct TtlCache<V> {
    ttl: Duration,
    entries: HashMap<String, (V, Instant)>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Returns a live entry; an expired one is evicted on the way.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some((value, expiry)) if *expiry > now => Some(value.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let expiry = Instant::now() + self.ttl;
        self.entries.insert(key.into(), (value, expiry));
    }

    /// Drops every expired entry, not only the ones read again.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, (_, expiry)| *expiry > now);
        before - self.entries.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Serves repeated requests for the same page from a [`TtlCache`].
pub struct CachingScraper<S> {
    inner: S,
    cache: Mutex<TtlCache<String>>,
}

impl<S: Scraper> CachingScraper<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Mutex::new(TtlCache::new(ttl)),
        }
    }

    fn key(req: &DrawRequest) -> String {
        match req.round {
            Some(round) => format!("round:{}", round),
            None => "latest".to_string(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Scraper> Scraper for CachingScraper<S> {
    async fn fetch(&self, req: &DrawRequest) -> Result<String, ScraperError> {
        let key = Self::key(req);
        if let Some(html) = self.cache.lock().await.get(&key) {
            debug!("Cache hit: {}", key);
            return Ok(html);
        }

        let html = self.inner.fetch(req).await?;
        let mut cache = self.cache.lock().await;
        let purged = cache.purge_expired();
        if purged > 0 {
            debug!("Purged {} expired pages, {} cached", purged, cache.len());
        }
        cache.insert(key, html.clone());
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingScraper {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Scraper for CountingScraper {
        async fn fetch(&self, req: &DrawRequest) -> Result<String, ScraperError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("page {:?}", req.round))
        }
    }

    #[test]
    fn entries_live_until_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a", 1);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.purge_expired(), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let mut cache = TtlCache::new(Duration::ZERO);
        cache.insert("a", 1);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 0);

        cache.insert("b", 2);
        assert_eq!(cache.purge_expired(), 1);
    }

    #[tokio::test]
    async fn caching_scraper_skips_repeat_fetches() {
        let scraper = CachingScraper::new(
            CountingScraper {
                calls: AtomicUsize::new(0),
            },
            Duration::from_secs(60),
        );
        let req = DrawRequest { round: Some(3) };

        let first = scraper.fetch(&req).await.unwrap();
        let second = scraper.fetch(&req).await.unwrap();
        scraper.fetch(&DrawRequest { round: None }).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(scraper.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_pages_of_other_rounds_are_dropped() {
        let scraper = CachingScraper::new(
            CountingScraper {
                calls: AtomicUsize::new(0),
            },
            Duration::from_millis(1),
        );
        for round in 1..=200 {
            scraper.fetch(&DrawRequest { round: Some(round) }).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        scraper.fetch(&DrawRequest { round: None }).await.unwrap();
        assert_eq!(scraper.cache.lock().await.len(), 1);
    }
}
