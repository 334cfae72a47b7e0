//! Page-number pagination for one store.
//!
//! Pages are walked sequentially from `start_page` to `end_page`. Page 1 is
//! always the bare `base_url`; later pages append the profile's pagination
//! query parameter. The scan stops early in two cases:
//!
//! - a page past the first needs a URL but no parameter is configured
//!   ([`ScanState::StoppedByConfig`]);
//! - a page after the first one attempted has no products
//!   ([`ScanState::StoppedByEmptyPage`]).
//!
//! An empty *first* page does not stop the scan, so a store that briefly
//! serves an empty landing page still gets its later pages read.

use chrono::{DateTime, Utc};
use serde::Serialize;
use vinyl_core::{Listing, SiteProfile};

use crate::error::ExtractError;
use crate::events::{EventCode, EventLog, ScrapeEvent};
use crate::extract::extract_listings;
use crate::fetch::PageFetcher;
use crate::selector::CompiledSelectors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    Scanning,
    StoppedByConfig,
    StoppedByEmptyPage,
    Done,
}

/// Everything one scan of one store produced.
#[derive(Debug, Clone, Serialize)]
pub struct SiteScrape {
    pub store: String,
    /// Listings of every page, in page order then document order.
    pub listings: Vec<Listing>,
    pub state: ScanState,
    /// Pages whose body was retrieved successfully.
    pub pages_fetched: u32,
    pub events: Vec<ScrapeEvent>,
    pub scraped_at: DateTime<Utc>,
}

/// Builds the URL of `page_num` for `profile`.
///
/// Returns `None` when the page cannot be addressed: a page past the first
/// on a profile without a pagination parameter.
#[must_use]
pub fn page_url(profile: &SiteProfile, page_num: u32) -> Option<String> {
    if page_num == 1 {
        return Some(profile.base_url.clone());
    }
    let param = profile.pagination_param.as_deref()?;
    let joiner = if profile.base_url.contains('?') { '&' } else { '?' };
    Some(format!("{}{joiner}{param}={page_num}", profile.base_url))
}

/// Scans every configured page of `profile`.
///
/// Never fails: fetch errors skip the page and are reported as events, and
/// an unreachable store simply yields no listings.
pub async fn scrape_site<F: PageFetcher>(
    fetcher: &F,
    profile: &SiteProfile,
    selectors: &CompiledSelectors,
) -> SiteScrape {
    let mut log = EventLog::new(&profile.name);
    log.record(
        EventCode::ScanStarted,
        None,
        Some(profile.base_url.as_str()),
        format!(
            "scanning up to {} pages ({}..={})",
            profile.page_span(),
            profile.start_page,
            profile.end_page
        ),
    );

    let mut state = ScanState::Scanning;
    let mut listings = Vec::new();
    let mut pages_fetched = 0u32;

    for page in profile.start_page..=profile.end_page {
        let Some(url) = page_url(profile, page) else {
            log.record(
                EventCode::PaginationUnavailable,
                Some(page),
                None,
                "no pagination parameter configured, remaining pages are not addressable",
            );
            state = ScanState::StoppedByConfig;
            break;
        };

        let html = match fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(err) => {
                log.record(
                    EventCode::FetchFailed,
                    Some(page),
                    Some(url.as_str()),
                    format!("{err} ({})", err.kind()),
                );
                continue;
            }
        };
        pages_fetched += 1;

        match extract_listings(&html, profile, selectors) {
            Ok(found) => {
                log.record(
                    EventCode::PageFetched,
                    Some(page),
                    Some(url.as_str()),
                    format!("{} listings", found.len()),
                );
                listings.extend(found);
            }
            Err(ExtractError::NoProductsOnPage) if page == profile.start_page => {
                log.record(
                    EventCode::EmptyFirstPage,
                    Some(page),
                    Some(url.as_str()),
                    "first page has no products, continuing",
                );
            }
            Err(ExtractError::NoProductsOnPage) => {
                log.record(
                    EventCode::PaginationExhausted,
                    Some(page),
                    Some(url.as_str()),
                    "page has no products, stopping",
                );
                state = ScanState::StoppedByEmptyPage;
                break;
            }
        }
    }

    if state == ScanState::Scanning {
        state = ScanState::Done;
    }
    log.record(
        EventCode::ScanFinished,
        None,
        None,
        format!(
            "{} listings from {pages_fetched} pages ({state:?})",
            listings.len()
        ),
    );

    SiteScrape {
        store: profile.name.clone(),
        listings,
        state,
        pages_fetched,
        events: log.into_events(),
        scraped_at: Utc::now(),
    }
}
