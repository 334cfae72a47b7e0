//! Configuration, profiles and the harvester shared by every command.

use std::sync::Arc;

use anyhow::Context;
use vinyl_core::{load_reference_albums, load_site_profiles, AppConfig, ProfileSet, ReferenceAlbum, SiteProfile};
use vinyl_scraper::{Harvester, HttpFetcher, SiteScrape};

use crate::render;

pub(crate) struct Session {
    pub(crate) config: AppConfig,
    pub(crate) profiles: ProfileSet,
    pub(crate) harvester: Harvester<HttpFetcher>,
}

impl Session {
    pub(crate) fn load(config: AppConfig) -> anyhow::Result<Self> {
        let profiles = load_site_profiles(&config.sites_path).with_context(|| {
            format!("loading site profiles from {}", config.sites_path.display())
        })?;
        if profiles.profiles.is_empty() {
            tracing::warn!(
                rejected = profiles.rejections.len(),
                "no valid site profiles configured"
            );
        }
        let harvester = Harvester::from_config(&config)?;
        Ok(Self {
            config,
            profiles,
            harvester,
        })
    }

    /// Looks up a store by its configured name.
    pub(crate) fn profile(&self, name: &str) -> anyhow::Result<&SiteProfile> {
        self.profiles.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.profiles.names().collect();
            anyhow::anyhow!(
                "unknown shop '{name}'; configured shops: {}",
                known.join(", ")
            )
        })
    }

    pub(crate) fn reference(&self) -> anyhow::Result<Vec<ReferenceAlbum>> {
        load_reference_albums(&self.config.reference_path).with_context(|| {
            format!(
                "loading reference albums from {}",
                self.config.reference_path.display()
            )
        })
    }

    /// Scrapes one store and reports its diagnostics on stderr.
    pub(crate) async fn scrape(&self, profile: &SiteProfile) -> anyhow::Result<Arc<SiteScrape>> {
        let scrape = self
            .harvester
            .scrape(profile)
            .await
            .with_context(|| format!("scraping {}", profile.name))?;
        render::print_events(&scrape.events);
        Ok(scrape)
    }
}
