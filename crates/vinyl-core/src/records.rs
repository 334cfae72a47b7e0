use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::price::parse_price;

/// Placeholder for an album title or price that could not be extracted.
///
/// It is ordinary text for matching purposes: an `"unknown"` album simply
/// never joins with a reference entry.
pub const UNKNOWN: &str = "unknown";

/// One product occurrence scraped from a store page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Listing {
    /// Name of the site profile the listing was scraped from.
    pub store: String,
    /// May be empty when neither an artist selector nor a `"Artist - Album"`
    /// title yielded one.
    pub artist: String,
    pub album: String,
    /// Price exactly as shown on the page, currency and formatting intact.
    pub price_text: String,
    /// Absolute product URL, or empty.
    pub link: String,
}

impl Listing {
    /// The `(store, artist, album, link)` tuple used for de-duplication.
    #[must_use]
    pub fn dedupe_key(&self) -> (&str, &str, &str, &str) {
        (&self.store, &self.artist, &self.album, &self.link)
    }
}

/// A listing whose normalized `(artist, album)` appears in the reference list.
///
/// Display fields come from the listing side of the join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub store: String,
    pub artist: String,
    pub album: String,
    pub price_text: String,
    pub link: String,
}

impl From<Listing> for Recommendation {
    fn from(listing: Listing) -> Self {
        Self {
            store: listing.store,
            artist: listing.artist,
            album: listing.album,
            price_text: listing.price_text,
            link: listing.link,
        }
    }
}

impl From<Recommendation> for Listing {
    fn from(rec: Recommendation) -> Self {
        Self {
            store: rec.store,
            artist: rec.artist,
            album: rec.album,
            price_text: rec.price_text,
            link: rec.link,
        }
    }
}

/// A listing tagged with its numeric price for cross-store comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    #[serde(flatten)]
    pub listing: Listing,
    /// `None` when `price_text` does not reduce to a number.
    pub parsed_price: Option<Decimal>,
}

impl From<Listing> for ComparisonRow {
    fn from(listing: Listing) -> Self {
        let parsed_price = parse_price(&listing.price_text);
        Self {
            listing,
            parsed_price,
        }
    }
}
