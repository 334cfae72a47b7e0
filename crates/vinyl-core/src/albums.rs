//! The curated reference album list that recommendations are matched against.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::normalize::{clean_display_text, normalize};
use crate::ConfigError;

/// Header names (after [`normalize`]) accepted for the artist column.
const ARTIST_HEADERS: [&str; 6] = ["artist", "band", "performer", "гурт/співак", "гурт", "виконавець"];
/// Header names (after [`normalize`]) accepted for the album column.
const ALBUM_HEADERS: [&str; 5] = ["album", "title", "назва альбому", "альбом", "назва"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceAlbum {
    pub artist: String,
    pub album: String,
}

impl ReferenceAlbum {
    #[must_use]
    pub fn new(artist: impl Into<String>, album: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            album: album.into(),
        }
    }
}

/// Load the reference album list from a CSV file with a header row.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, is not valid CSV, or
/// has no recognizable artist or album column.
pub fn load_reference_albums(path: &Path) -> Result<Vec<ReferenceAlbum>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let albums = parse_reference_albums(&content, &path.display().to_string())?;
    if albums.is_empty() {
        tracing::warn!(path = %path.display(), "reference album list is empty");
    } else {
        tracing::info!(path = %path.display(), count = albums.len(), "loaded reference albums");
    }
    Ok(albums)
}

/// Parses reference albums from CSV text.
///
/// Columns are located by header name; any other columns (rank, year, …)
/// are ignored. Rows without an album title are skipped.
///
/// # Errors
///
/// Returns `ConfigError` on malformed CSV or missing artist/album columns.
pub fn parse_reference_albums(content: &str, source: &str) -> Result<Vec<ReferenceAlbum>, ConfigError> {
    let csv_err = |e: csv::Error| ConfigError::Csv {
        path: source.to_owned(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.trim_start_matches('\u{feff}').as_bytes());
    let headers = reader.headers().map_err(csv_err)?.clone();

    let find_column = |aliases: &[&str], column: &'static str| {
        headers
            .iter()
            .position(|h| aliases.contains(&normalize(h).as_str()))
            .ok_or_else(|| ConfigError::MissingReferenceColumn {
                column,
                headers: headers.iter().collect::<Vec<_>>().join(", "),
            })
    };
    let artist_idx = find_column(&ARTIST_HEADERS, "artist")?;
    let album_idx = find_column(&ALBUM_HEADERS, "album")?;

    let mut albums = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.map_err(csv_err)?;
        let album = clean_display_text(row.get(album_idx).unwrap_or_default());
        if album.is_empty() {
            tracing::debug!(line = line + 2, "skipping reference row without album");
            continue;
        }
        let artist = clean_display_text(row.get(artist_idx).unwrap_or_default());
        albums.push(ReferenceAlbum { artist, album });
    }
    Ok(albums)
}
