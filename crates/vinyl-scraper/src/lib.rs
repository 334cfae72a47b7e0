pub mod cache;
pub mod error;
pub mod events;
pub mod extract;
pub mod fetch;
pub mod harvest;
pub mod pagination;
pub mod selector;

pub use cache::ScrapeCache;
pub use error::{ExtractError, FetchError, ScraperError};
pub use events::{EventCode, EventLevel, ScrapeEvent};
pub use extract::extract_listings;
pub use fetch::{HttpFetcher, PageFetcher};
pub use harvest::Harvester;
pub use pagination::{page_url, scrape_site, ScanState, SiteScrape};
pub use selector::{Cardinality, CompiledSelectors, SelectorChain};
