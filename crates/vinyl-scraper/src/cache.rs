//! In-memory scrape results keyed by site profile.
//!
//! Each profile gets its own slot behind an async mutex. A caller that finds
//! the slot locked waits for the in-flight scrape and then reads its result,
//! so one profile is never fetched twice concurrently.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use vinyl_core::SiteProfile;

use crate::pagination::SiteScrape;

#[derive(Debug)]
struct CachedScrape {
    scrape: Arc<SiteScrape>,
    stored_at: Instant,
}

type Slot = Arc<Mutex<Option<CachedScrape>>>;

#[derive(Debug)]
pub struct ScrapeCache {
    ttl: Duration,
    slots: Mutex<HashMap<SiteProfile, Slot>>,
}

impl ScrapeCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the fresh cached scrape for `profile`, or runs `scrape` and
    /// stores its result.
    ///
    /// Errors are not cached; the next call runs `scrape` again.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `scrape`.
    pub async fn get_or_scrape<E, Fut>(
        &self,
        profile: &SiteProfile,
        scrape: impl FnOnce() -> Fut,
    ) -> Result<Arc<SiteScrape>, E>
    where
        Fut: Future<Output = Result<SiteScrape, E>>,
    {
        let slot = {
            let mut slots = self.slots.lock().await;
            Arc::clone(slots.entry(profile.clone()).or_default())
        };

        let mut entry = slot.lock().await;
        if let Some(cached) = entry.as_ref() {
            if cached.stored_at.elapsed() < self.ttl {
                tracing::debug!(store = %profile.name, "scrape cache hit");
                return Ok(Arc::clone(&cached.scrape));
            }
        }

        tracing::debug!(store = %profile.name, "scrape cache miss");
        let fresh = Arc::new(scrape().await?);
        *entry = Some(CachedScrape {
            scrape: Arc::clone(&fresh),
            stored_at: Instant::now(),
        });
        Ok(fresh)
    }

    /// Drops the cached result for `profile`, if any.
    pub async fn invalidate(&self, profile: &SiteProfile) {
        self.slots.lock().await.remove(profile);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use vinyl_core::{SelectorFamily, SelectorSet};

    use super::*;
    use crate::pagination::ScanState;

    fn profile(name: &str) -> SiteProfile {
        SiteProfile {
            name: name.to_owned(),
            base_url: format!("https://{}.example/", name.to_lowercase()),
            pagination_param: None,
            start_page: 1,
            end_page: 1,
            selectors: SelectorSet {
                product_container: SelectorFamily::parse("div.item"),
                title: SelectorFamily::parse(".title"),
                price: SelectorFamily::parse(".price"),
                link: SelectorFamily::parse("a"),
                artist: SelectorFamily::default(),
            },
        }
    }

    fn scrape_of(profile: &SiteProfile) -> SiteScrape {
        SiteScrape {
            store: profile.name.clone(),
            listings: Vec::new(),
            state: ScanState::Done,
            pages_fetched: 1,
            events: Vec::new(),
            scraped_at: Utc::now(),
        }
    }

    async fn counted(
        cache: &ScrapeCache,
        profile: &SiteProfile,
        calls: &AtomicUsize,
    ) -> Result<Arc<SiteScrape>, String> {
        cache
            .get_or_scrape(profile, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::task::yield_now().await;
                Ok(scrape_of(profile))
            })
            .await
    }

    #[tokio::test]
    async fn second_call_within_ttl_is_served_from_cache() {
        let cache = ScrapeCache::new(Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);
        let p = profile("Vinyl Room");

        let first = counted(&cache, &p, &calls).await.unwrap();
        let second = counted(&cache, &p, &calls).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn zero_ttl_always_rescrapes() {
        let cache = ScrapeCache::new(Duration::ZERO);
        let calls = AtomicUsize::new(0);
        let p = profile("Vinyl Room");

        counted(&cache, &p, &calls).await.unwrap();
        counted(&cache, &p, &calls).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_scrapes_of_one_profile_run_once() {
        let cache = ScrapeCache::new(Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);
        let p = profile("Vinyl Room");

        let (a, b, c) = tokio::join!(
            counted(&cache, &p, &calls),
            counted(&cache, &p, &calls),
            counted(&cache, &p, &calls),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert!(c.is_ok());
    }

    #[tokio::test]
    async fn distinct_profiles_have_distinct_entries() {
        let cache = ScrapeCache::new(Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);

        let a = counted(&cache, &profile("Vinyl Room"), &calls).await.unwrap();
        let b = counted(&cache, &profile("Plastinka"), &calls).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(a.store, "Vinyl Room");
        assert_eq!(b.store, "Plastinka");
    }

    #[tokio::test]
    async fn a_changed_profile_is_a_new_key() {
        let cache = ScrapeCache::new(Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);
        let p = profile("Vinyl Room");
        let mut widened = p.clone();
        widened.end_page = 3;

        counted(&cache, &p, &calls).await.unwrap();
        counted(&cache, &widened, &calls).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = ScrapeCache::new(Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);
        let p = profile("Vinyl Room");

        let failed: Result<Arc<SiteScrape>, String> = cache
            .get_or_scrape(&p, || async { Err("boom".to_owned()) })
            .await;
        assert!(failed.is_err());

        counted(&cache, &p, &calls).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_a_rescrape() {
        let cache = ScrapeCache::new(Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);
        let p = profile("Vinyl Room");

        counted(&cache, &p, &calls).await.unwrap();
        cache.invalidate(&p).await;
        counted(&cache, &p, &calls).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
