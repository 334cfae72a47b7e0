use thiserror::Error;

/// Failure to retrieve one page. Never retried; the page is skipped.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },
}

impl FetchError {
    /// Machine-readable label used in diagnostic events.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout { .. } => "timeout",
            FetchError::Network { .. } => "network",
            FetchError::Status { .. } => "status",
        }
    }
}

/// Outcome of extracting listings from a page that yields nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no product containers matched on the page")]
    NoProductsOnPage,
}

/// Site-level failures: the site is excluded, other sites proceed.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid {family} selector \"{selector}\" for {store}: {reason}")]
    InvalidSelector {
        store: String,
        family: &'static str,
        selector: String,
        reason: String,
    },
}
