//! `compare` command handler.

use std::sync::Arc;

use vinyl_core::{Listing, SiteProfile};
use vinyl_match::{compare, other_stores, recommend, select_by_ids};
use vinyl_scraper::SiteScrape;

use crate::render;
use crate::session::Session;

/// Re-runs the recommendation for `shop`, picks the albums listed in `ids`
/// and looks for them in the other stores.
///
/// # Errors
///
/// Returns an error if `ids` selects nothing, a requested store is unknown
/// or is the origin store, or no store is left to compare against.
pub(crate) async fn run_compare(
    session: &Session,
    shop: &str,
    ids: &str,
    against: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let origin = session.profile(shop)?;
    let scrape = session.scrape(origin).await?;
    let reference = session.reference()?;
    let recommendations = recommend(&scrape.listings, &reference);

    let selected = select_by_ids(&recommendations, ids);
    if selected.is_empty() {
        anyhow::bail!(
            "IDs \"{ids}\" match none of the {} recommendations; run `recommend --shop {shop}` to list them",
            recommendations.len()
        );
    }

    let targets = comparison_targets(other_stores(&session.profiles.profiles, &selected), against)?;
    let results = session.harvester.scrape_many(&targets).await;

    let mut scraped: Vec<Arc<SiteScrape>> = Vec::with_capacity(results.len());
    for (profile, result) in targets.iter().zip(results) {
        match result {
            Ok(s) => {
                render::print_events(&s.events);
                scraped.push(s);
            }
            Err(e) => eprintln!("[error] {}: skipped: {e}", profile.name),
        }
    }

    let stores: Vec<(&str, &[Listing])> = scraped
        .iter()
        .map(|s| (s.store.as_str(), s.listings.as_slice()))
        .collect();
    let report = compare(&selected, &stores);

    if json {
        render::print_json(&report)
    } else {
        render::print_report(&report);
        Ok(())
    }
}

/// Narrows the candidate stores to the ones named in `against`, keeping
/// every candidate when `against` is empty.
fn comparison_targets(
    candidates: Vec<&SiteProfile>,
    against: &[String],
) -> anyhow::Result<Vec<SiteProfile>> {
    let targets: Vec<SiteProfile> = if against.is_empty() {
        candidates.into_iter().cloned().collect()
    } else {
        against
            .iter()
            .map(|name| {
                candidates
                    .iter()
                    .find(|p| p.name == *name)
                    .map(|p| (*p).clone())
                    .ok_or_else(|| {
                        anyhow::anyhow!("shop '{name}' is unknown or is where the albums came from")
                    })
            })
            .collect::<anyhow::Result<_>>()?
    };

    if targets.is_empty() {
        anyhow::bail!("no other shops to compare against");
    }
    Ok(targets)
}
