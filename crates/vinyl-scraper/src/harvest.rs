//! Entry point for scraping one or many stores through the cache.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use vinyl_core::{AppConfig, SiteProfile};

use crate::cache::ScrapeCache;
use crate::error::ScraperError;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::pagination::{scrape_site, SiteScrape};
use crate::selector::CompiledSelectors;

/// Owns a fetcher and the scrape cache for the lifetime of the process.
#[derive(Debug)]
pub struct Harvester<F> {
    fetcher: F,
    cache: ScrapeCache,
    max_concurrent_sites: usize,
}

impl Harvester<HttpFetcher> {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        Ok(Self::new(
            HttpFetcher::from_config(config)?,
            Duration::from_secs(config.cache_ttl_secs),
            config.max_concurrent_sites,
        ))
    }
}

impl<F: PageFetcher> Harvester<F> {
    #[must_use]
    pub fn new(fetcher: F, cache_ttl: Duration, max_concurrent_sites: usize) -> Self {
        Self {
            fetcher,
            cache: ScrapeCache::new(cache_ttl),
            max_concurrent_sites: max_concurrent_sites.max(1),
        }
    }

    /// Scrapes every page of `profile`, reusing a fresh cached result.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidSelector`] when a selector of the
    /// profile is not valid CSS. Page-level failures never surface here;
    /// they are recorded in [`SiteScrape::events`].
    pub async fn scrape(&self, profile: &SiteProfile) -> Result<Arc<SiteScrape>, ScraperError> {
        self.cache
            .get_or_scrape(profile, || async {
                let selectors = CompiledSelectors::compile(profile)?;
                Ok::<_, ScraperError>(scrape_site(&self.fetcher, profile, &selectors).await)
            })
            .await
    }

    /// Scrapes several stores concurrently. Results come back in input
    /// order; a failed store does not affect the others.
    pub async fn scrape_many(
        &self,
        profiles: &[SiteProfile],
    ) -> Vec<Result<Arc<SiteScrape>, ScraperError>> {
        let results: Vec<_> = stream::iter(profiles)
            .map(|profile| self.scrape(profile))
            .buffered(self.max_concurrent_sites)
            .collect()
            .await;

        for (profile, result) in profiles.iter().zip(&results) {
            if let Err(e) = result {
                tracing::error!(store = %profile.name, error = %e, "store excluded from results");
            }
        }
        results
    }
}
