//! Turns one fetched page into listings using a profile's selectors.

use reqwest::Url;
use scraper::{ElementRef, Html};
use vinyl_core::normalize::clean_display_text;
use vinyl_core::{Listing, SiteProfile, UNKNOWN};

use crate::error::ExtractError;
use crate::selector::CompiledSelectors;

/// Separator between artist and album in combined title text.
const ARTIST_ALBUM_SEPARATOR: &str = " - ";

/// Extracts every product on the page, in document order.
///
/// Items are never dropped because a field is missing: the field falls back
/// to [`UNKNOWN`] (album, price) or an empty string (artist, link).
///
/// # Errors
///
/// Returns [`ExtractError::NoProductsOnPage`] when no product container
/// selector matches.
pub fn extract_listings(
    html: &str,
    profile: &SiteProfile,
    selectors: &CompiledSelectors,
) -> Result<Vec<Listing>, ExtractError> {
    let document = Html::parse_document(html);
    let containers = selectors
        .product_container
        .resolve_all(document.root_element());
    if containers.is_empty() {
        return Err(ExtractError::NoProductsOnPage);
    }

    let base = Url::parse(&profile.base_url).ok();
    Ok(containers
        .into_iter()
        .map(|container| extract_listing(container, profile, selectors, base.as_ref()))
        .collect())
}

fn extract_listing(
    container: ElementRef<'_>,
    profile: &SiteProfile,
    selectors: &CompiledSelectors,
    base: Option<&Url>,
) -> Listing {
    let artist = selectors
        .artist
        .resolve_first(container)
        .map(|e| clean_display_text(&element_text(e)))
        .unwrap_or_default();

    let title = selectors
        .title
        .resolve_first(container)
        .map(|e| clean_display_text(&element_text(e)));

    let (artist, album) = split_artist_album(artist, title);

    let price_text = selectors
        .price
        .resolve_first(container)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_owned());

    let link = selectors
        .link
        .resolve_first_where(container, |e| href_of(e).is_some())
        .and_then(|e| href_of(&e))
        .map(|href| absolutize(base, href))
        .unwrap_or_default();

    Listing {
        store: profile.name.clone(),
        artist,
        album,
        price_text,
        link,
    }
}

/// Decides artist and album from the artist selector result and the title
/// text.
///
/// Without an artist, a `"Artist - Album"` title is split on its first
/// separator; a title without one is all album. With an artist, the title
/// is the album, minus a leading `"<artist> - "` some stores repeat.
#[must_use]
pub fn split_artist_album(artist: String, title: Option<String>) -> (String, String) {
    let (artist, album) = match title {
        None => (artist, String::new()),
        Some(title) if artist.is_empty() => match title.split_once(ARTIST_ALBUM_SEPARATOR) {
            Some((left, right)) => (left.trim().to_owned(), right.trim().to_owned()),
            None => (artist, title),
        },
        Some(title) => {
            let prefix = format!("{artist}{ARTIST_ALBUM_SEPARATOR}");
            let album = match title.strip_prefix(&prefix) {
                Some(rest) => rest.trim().to_owned(),
                None => title,
            };
            (artist, album)
        }
    };

    if album.is_empty() {
        (artist, UNKNOWN.to_owned())
    } else {
        (artist, album)
    }
}

/// Concatenates the element's text nodes, each trimmed.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn href_of<'a>(element: &ElementRef<'a>) -> Option<&'a str> {
    element
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|h| !h.is_empty())
}

fn absolutize(base: Option<&Url>, href: &str) -> String {
    match base {
        Some(base) => base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_default(),
        None => href.to_owned(),
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
