//! Joins scraped listings against the reference album list.

use std::collections::HashSet;

use vinyl_core::{normalize, Listing, Recommendation, ReferenceAlbum};

/// Listings whose normalized `(artist, album)` appears in `reference`.
///
/// Duplicate `(store, artist, album, link)` tuples keep their first
/// occurrence. The result is sorted by the listing's display artist then
/// album, case-sensitively, keeping input order for ties.
#[must_use]
pub fn recommend(listings: &[Listing], reference: &[ReferenceAlbum]) -> Vec<Recommendation> {
    if listings.is_empty() || reference.is_empty() {
        return Vec::new();
    }

    let wanted: HashSet<(String, String)> = reference
        .iter()
        .map(|r| (normalize(&r.artist), normalize(&r.album)))
        .collect();

    let mut seen = HashSet::new();
    let mut recommendations: Vec<Recommendation> = listings
        .iter()
        .filter(|l| wanted.contains(&(normalize(&l.artist), normalize(&l.album))))
        .filter(|l| seen.insert(l.dedupe_key()))
        .cloned()
        .map(Recommendation::from)
        .collect();

    recommendations.sort_by(|a, b| {
        (a.artist.as_str(), a.album.as_str()).cmp(&(b.artist.as_str(), b.album.as_str()))
    });

    tracing::debug!(
        listings = listings.len(),
        reference = reference.len(),
        matched = recommendations.len(),
        "reference join complete"
    );
    recommendations
}
