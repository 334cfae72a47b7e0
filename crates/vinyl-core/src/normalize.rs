//! Comparison keys for artist and album text.
//!
//! The output is only ever used to decide equality or containment; display
//! code keeps the original strings.

const NBSP: char = '\u{a0}';

/// Canonicalizes `s` for comparison: non-breaking spaces become regular
/// spaces, surrounding whitespace is trimmed, and the result is lower-cased.
///
/// Runs of inner whitespace are kept as-is, so `"The  Wall"` and
/// `"The Wall"` stay distinct.
#[must_use]
pub fn normalize(s: &str) -> String {
    s.replace(NBSP, " ").trim().to_lowercase()
}

/// Replaces non-breaking spaces and trims, without changing case.
///
/// Used on scraped display text before it is stored in a listing.
#[must_use]
pub fn clean_display_text(s: &str) -> String {
    s.replace(NBSP, " ").trim().to_owned()
}
