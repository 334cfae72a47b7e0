//! Finds a target album among another store's listings.

use vinyl_core::{normalize, Listing};

/// Listings matching `(target_artist, target_album)`, in input order.
///
/// Matching is substring containment on normalized text, so edition
/// suffixes in scraped titles still match. An empty target artist matches
/// any artist; in that case an exact normalized album match also counts.
#[must_use]
pub fn search(listings: &[Listing], target_artist: &str, target_album: &str) -> Vec<Listing> {
    let artist = normalize(target_artist);
    let album = normalize(target_album);
    listings
        .iter()
        .filter(|l| is_match(l, &artist, &album))
        .cloned()
        .collect()
}

fn is_match(listing: &Listing, artist: &str, album: &str) -> bool {
    let listing_album = normalize(&listing.album);
    let contained = listing_album.contains(album)
        && (artist.is_empty() || normalize(&listing.artist).contains(artist));
    let exact_album = artist.is_empty() && listing_album == album;
    contained || exact_album
}
