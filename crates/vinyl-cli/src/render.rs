//! Plain-text tables and JSON output.

use serde::Serialize;
use vinyl_core::{ComparisonRow, Listing, Recommendation};
use vinyl_match::{ComparisonReport, PriceGroup};
use vinyl_scraper::{EventLevel, ScrapeEvent};

const ARTIST_WIDTH: usize = 28;
const ALBUM_WIDTH: usize = 40;
const PRICE_WIDTH: usize = 16;
const STORE_WIDTH: usize = 16;

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes warnings and errors of a scrape to stderr. Info events are left to
/// the tracing subscriber.
pub(crate) fn print_events(events: &[ScrapeEvent]) {
    for event in events.iter().filter(|e| e.level != EventLevel::Info) {
        eprintln!("{}", event_line(event));
    }
}

fn event_line(event: &ScrapeEvent) -> String {
    let level = match event.level {
        EventLevel::Info => "info",
        EventLevel::Warning => "warning",
        EventLevel::Error => "error",
    };
    let page = event
        .page
        .map(|p| format!(" page {p}"))
        .unwrap_or_default();
    format!("[{level}] {}{page}: {}", event.store, event.message)
}

/// Cuts `text` to `width` characters, marking the cut with `...`.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        text.to_owned()
    }
}

fn cell(text: &str, width: usize) -> String {
    format!("{:<width$}", truncate(text, width - 1))
}

pub(crate) fn print_listings(listings: &[Listing]) {
    println!(
        "{}{}{}LINK",
        cell("ARTIST", ARTIST_WIDTH),
        cell("ALBUM", ALBUM_WIDTH),
        cell("PRICE", PRICE_WIDTH)
    );
    for l in listings {
        println!(
            "{}{}{}{}",
            cell(&l.artist, ARTIST_WIDTH),
            cell(&l.album, ALBUM_WIDTH),
            cell(&l.price_text, PRICE_WIDTH),
            l.link
        );
    }
}

pub(crate) fn print_recommendations(recommendations: &[Recommendation]) {
    println!(
        "{:<5}{}{}{}LINK",
        "ID",
        cell("ARTIST", ARTIST_WIDTH),
        cell("ALBUM", ALBUM_WIDTH),
        cell("PRICE", PRICE_WIDTH)
    );
    for (id, r) in recommendations.iter().enumerate() {
        println!(
            "{id:<5}{}{}{}{}",
            cell(&r.artist, ARTIST_WIDTH),
            cell(&r.album, ALBUM_WIDTH),
            cell(&r.price_text, PRICE_WIDTH),
            r.link
        );
    }
}

fn print_rows(rows: &[ComparisonRow]) {
    for row in rows {
        let l = &row.listing;
        println!(
            "  {}{}{}",
            cell(&l.store, STORE_WIDTH),
            cell(&l.price_text, PRICE_WIDTH),
            if l.link.is_empty() { "N/A" } else { l.link.as_str() }
        );
    }
}

fn group_heading(group: &PriceGroup) -> String {
    let heading = format!("{} - {}", group.artist, group.album);
    match group.cheapest() {
        Some(row) if group.rows.len() > 1 => format!(
            "{heading} (cheapest: {} at {})",
            row.listing.store, row.listing.price_text
        ),
        _ => heading,
    }
}

pub(crate) fn print_report(report: &ComparisonReport) {
    for target in &report.coverage {
        if target.found_elsewhere {
            println!(
                "{} - {}: found in {}",
                target.artist,
                target.album,
                target.matched_stores.join(", ")
            );
        } else {
            println!(
                "{} - {}: not found outside {}",
                target.artist, target.album, target.origin_store
            );
        }
    }

    println!();
    if report.groups.is_empty() {
        println!("no comparable prices found");
        return;
    }
    for group in &report.groups {
        println!("{}", group_heading(group));
        print_rows(&group.rows);
    }

    let unpriced = report.rows.iter().filter(|r| r.parsed_price.is_none()).count();
    if unpriced > 0 {
        println!();
        println!("{unpriced} offer(s) without a readable price are omitted above");
    }
}
