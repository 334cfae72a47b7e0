use std::str::FromStr;

use rust_decimal::Decimal;
use vinyl_core::{SelectorFamily, SelectorSet, UNKNOWN};

use super::*;

fn rec(store: &str, artist: &str, album: &str, price: &str) -> Recommendation {
    Recommendation {
        store: store.to_owned(),
        artist: artist.to_owned(),
        album: album.to_owned(),
        price_text: price.to_owned(),
        link: format!("https://{}.example/{}", store.to_lowercase(), album.len()),
    }
}

fn listing(store: &str, artist: &str, album: &str, price: &str, link: &str) -> Listing {
    Listing {
        store: store.to_owned(),
        artist: artist.to_owned(),
        album: album.to_owned(),
        price_text: price.to_owned(),
        link: link.to_owned(),
    }
}

fn profile(name: &str) -> SiteProfile {
    SiteProfile {
        name: name.to_owned(),
        base_url: "https://store.example/".to_owned(),
        pagination_param: None,
        start_page: 1,
        end_page: 1,
        selectors: SelectorSet {
            product_container: SelectorFamily::parse("div"),
            title: SelectorFamily::parse("h3"),
            price: SelectorFamily::parse("span"),
            link: SelectorFamily::parse("a"),
            artist: SelectorFamily::default(),
        },
    }
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn parse_ids_ignores_junk_and_duplicates() {
    assert_eq!(parse_ids("5, 0,1, x, -2, 1.5, , 1"), [0, 1, 5]);
    assert!(parse_ids("").is_empty());
}

#[test]
fn select_by_ids_keeps_recommendation_order_and_skips_unknown_ids() {
    let recs = [
        rec("Vinyl Room", "Nirvana", "Nevermind", "900 ₴"),
        rec("Vinyl Room", "Pink Floyd", "The Wall", "1 500 ₴"),
        rec("Vinyl Room", "Queen", "Innuendo", "1 100 ₴"),
    ];
    let picked = select_by_ids(&recs, "2, 0, 42");
    let albums: Vec<&str> = picked.iter().map(|r| r.album.as_str()).collect();
    assert_eq!(albums, ["Nevermind", "Innuendo"]);
}

#[test]
fn other_stores_excludes_origin_stores() {
    let profiles = [profile("Vinyl Room"), profile("Plastinka"), profile("Groove Shop")];
    let selected = [rec("Vinyl Room", "Nirvana", "Nevermind", "900 ₴")];
    let names: Vec<&str> = other_stores(&profiles, &selected)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["Plastinka", "Groove Shop"]);
}

#[test]
fn report_includes_originals_and_hits_without_duplicates() {
    let selected = [rec("Vinyl Room", "Pink Floyd", "The Wall", "1 500 ₴")];
    let plastinka = [
        listing("Plastinka", "Pink Floyd", "The Wall (2LP)", "1 234,50 ₴", "/a"),
        listing("Plastinka", "Pink Floyd", "The Wall (2LP)", "1 234,50 ₴", "/a"),
        listing("Plastinka", "Queen", "Innuendo", "800 ₴", "/b"),
    ];
    let report = compare(&selected, &[("Plastinka", &plastinka[..])]);

    let stores: Vec<&str> = report.rows.iter().map(|r| r.listing.store.as_str()).collect();
    assert_eq!(stores, ["Vinyl Room", "Plastinka"]);
    assert_eq!(report.rows[1].parsed_price, Some(dec("1234.50")));
}

#[test]
fn coverage_reports_where_each_album_was_found() {
    let selected = [
        rec("Vinyl Room", "Pink Floyd", "The Wall", "1 500 ₴"),
        rec("Vinyl Room", "Queen", "Innuendo", "1 100 ₴"),
    ];
    let plastinka = [listing("Plastinka", "Pink Floyd", "The Wall", "1 400 ₴", "/a")];
    let groove = [listing("Groove Shop", "PINK FLOYD", "the wall", "1 450 ₴", "/g")];
    let report = compare(
        &selected,
        &[("Plastinka", &plastinka[..]), ("Groove Shop", &groove[..])],
    );

    assert_eq!(report.coverage.len(), 2);
    assert_eq!(report.coverage[0].matched_stores, ["Plastinka", "Groove Shop"]);
    assert!(report.coverage[0].found_elsewhere);
    assert_eq!(report.coverage[1].origin_store, "Vinyl Room");
    assert!(report.coverage[1].matched_stores.is_empty());
    assert!(!report.coverage[1].found_elsewhere);
}

#[test]
fn unparseable_prices_stay_in_rows_but_leave_price_groups() {
    let selected = [rec("Vinyl Room", "Pink Floyd", "The Wall", "Невідомо")];
    let plastinka = [listing("Plastinka", "Pink Floyd", "The Wall", UNKNOWN, "/a")];
    let report = compare(&selected, &[("Plastinka", &plastinka[..])]);

    assert_eq!(report.rows.len(), 2);
    assert!(report.rows.iter().all(|r| r.parsed_price.is_none()));
    assert!(report.groups.is_empty());
}

#[test]
fn groups_are_keyed_by_display_text_and_sorted_by_price() {
    let selected = [rec("Vinyl Room", "Pink Floyd", "The Wall", "1 500 ₴")];
    let plastinka = [
        listing("Plastinka", "Pink Floyd", "The Wall", "1 234,50 ₴", "/a"),
        listing("Plastinka", "Pink Floyd", "The Wall", "Невідомо", "/b"),
    ];
    let groove = [
        listing("Groove Shop", "Pink Floyd", "The Wall", "1 300 ₴", "/g"),
        listing("Groove Shop", "Pink Floyd", "The Wall (Deluxe)", "2 100 ₴", "/h"),
    ];
    let report = compare(
        &selected,
        &[("Plastinka", &plastinka[..]), ("Groove Shop", &groove[..])],
    );

    assert_eq!(report.rows.len(), 5);
    let keys: Vec<(&str, &str)> = report
        .groups
        .iter()
        .map(|g| (g.artist.as_str(), g.album.as_str()))
        .collect();
    assert_eq!(
        keys,
        [("Pink Floyd", "The Wall"), ("Pink Floyd", "The Wall (Deluxe)")]
    );

    let prices: Vec<Decimal> = report.groups[0]
        .rows
        .iter()
        .filter_map(|r| r.parsed_price)
        .collect();
    assert_eq!(prices, [dec("1234.50"), dec("1300"), dec("1500")]);
    assert_eq!(
        report.groups[0].cheapest().map(|r| r.listing.store.as_str()),
        Some("Plastinka")
    );
}

#[test]
fn no_stores_yields_only_originals() {
    let selected = [rec("Vinyl Room", "Nirvana", "Nevermind", "900 ₴")];
    let report = compare(&selected, &[]);
    assert_eq!(report.rows.len(), 1);
    assert!(!report.coverage[0].found_elsewhere);
    assert_eq!(report.groups.len(), 1);
}

#[test]
fn report_serializes_rows_flat() {
    let selected = [rec("Vinyl Room", "Nirvana", "Nevermind", "900 ₴")];
    let report = compare(&selected, &[]);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["rows"][0]["store"], "Vinyl Room");
    assert_eq!(json["coverage"][0]["found_elsewhere"], false);
}
