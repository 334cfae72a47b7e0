//! Cross-store price comparison for albums picked from a recommendation list.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;
use vinyl_core::{ComparisonRow, Listing, Recommendation, SiteProfile};

use crate::search::search;

/// Whether one selected album turned up in the compared stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetCoverage {
    pub artist: String,
    pub album: String,
    /// Store the album was originally recommended from.
    pub origin_store: String,
    /// Compared stores with at least one match, in comparison order.
    pub matched_stores: Vec<String>,
    pub found_elsewhere: bool,
}

/// Priced offers sharing one display `(artist, album)`, cheapest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceGroup {
    pub artist: String,
    pub album: String,
    pub rows: Vec<ComparisonRow>,
}

impl PriceGroup {
    #[must_use]
    pub fn cheapest(&self) -> Option<&ComparisonRow> {
        self.rows.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    /// Originals plus every hit, de-duplicated, priced or not.
    pub rows: Vec<ComparisonRow>,
    pub coverage: Vec<TargetCoverage>,
    /// Only rows whose price parsed, grouped and sorted by price.
    pub groups: Vec<PriceGroup>,
}

/// Parses a comma-separated list of recommendation IDs such as `"0, 1, 5"`.
///
/// Tokens that are not plain non-negative integers are ignored. The result
/// is sorted and free of duplicates.
#[must_use]
pub fn parse_ids(input: &str) -> Vec<usize> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|t| t.parse().ok())
        .collect::<BTreeSet<usize>>()
        .into_iter()
        .collect()
}

/// Recommendations whose position is listed in `input`, in recommendation
/// order. IDs past the end are ignored.
#[must_use]
pub fn select_by_ids(recommendations: &[Recommendation], input: &str) -> Vec<Recommendation> {
    parse_ids(input)
        .into_iter()
        .filter_map(|id| recommendations.get(id).cloned())
        .collect()
}

/// Profiles other than the stores the selected albums came from.
#[must_use]
pub fn other_stores<'a>(
    profiles: &'a [SiteProfile],
    selected: &[Recommendation],
) -> Vec<&'a SiteProfile> {
    let origins: HashSet<&str> = selected.iter().map(|r| r.store.as_str()).collect();
    profiles
        .iter()
        .filter(|p| !origins.contains(p.name.as_str()))
        .collect()
}

/// Searches every store's listings for each selected album.
///
/// `stores` pairs a store name with the listings scraped from it.
#[must_use]
pub fn compare(selected: &[Recommendation], stores: &[(&str, &[Listing])]) -> ComparisonReport {
    let mut rows: Vec<ComparisonRow> = Vec::new();
    let mut seen: HashSet<(String, String, String, String)> = HashSet::new();
    let mut push_row = |listing: Listing, rows: &mut Vec<ComparisonRow>| {
        let key = {
            let (store, artist, album, link) = listing.dedupe_key();
            (
                store.to_owned(),
                artist.to_owned(),
                album.to_owned(),
                link.to_owned(),
            )
        };
        if seen.insert(key) {
            rows.push(ComparisonRow::from(listing));
        }
    };

    for original in selected {
        push_row(Listing::from(original.clone()), &mut rows);
    }

    let mut coverage = Vec::with_capacity(selected.len());
    for target in selected {
        let mut matched_stores = Vec::new();
        for (store, listings) in stores {
            let hits = search(listings, &target.artist, &target.album);
            if hits.is_empty() {
                tracing::debug!(store, artist = %target.artist, album = %target.album, "no match");
                continue;
            }
            matched_stores.push((*store).to_owned());
            for hit in hits {
                push_row(hit, &mut rows);
            }
        }
        if matched_stores.is_empty() {
            tracing::info!(
                artist = %target.artist,
                album = %target.album,
                "album not found in any compared store"
            );
        }
        coverage.push(TargetCoverage {
            artist: target.artist.clone(),
            album: target.album.clone(),
            origin_store: target.store.clone(),
            found_elsewhere: !matched_stores.is_empty(),
            matched_stores,
        });
    }

    let groups = price_groups(&rows);
    ComparisonReport {
        rows,
        coverage,
        groups,
    }
}

fn price_groups(rows: &[ComparisonRow]) -> Vec<PriceGroup> {
    let mut by_album: BTreeMap<(&str, &str), Vec<ComparisonRow>> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.parsed_price.is_some()) {
        by_album
            .entry((row.listing.artist.as_str(), row.listing.album.as_str()))
            .or_default()
            .push(row.clone());
    }

    by_album
        .into_iter()
        .map(|((artist, album), mut rows)| {
            rows.sort_by_key(|r| r.parsed_price);
            PriceGroup {
                artist: artist.to_owned(),
                album: album.to_owned(),
                rows,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "compare_test.rs"]
mod tests;
