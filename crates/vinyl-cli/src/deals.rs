//! `shops`, `deals` and `recommend` command handlers.

use serde::Serialize;
use vinyl_core::{Recommendation, SiteProfile};
use vinyl_match::recommend;

use crate::render;
use crate::session::Session;

#[derive(Debug, Serialize)]
struct RejectedProfile<'a> {
    index: usize,
    name: Option<&'a str>,
    reason: String,
}

#[derive(Debug, Serialize)]
struct ShopsView<'a> {
    shops: &'a [SiteProfile],
    rejected: Vec<RejectedProfile<'a>>,
}

#[derive(Debug, Serialize)]
struct NumberedRecommendation<'a> {
    id: usize,
    #[serde(flatten)]
    recommendation: &'a Recommendation,
}

pub(crate) fn run_shops(session: &Session, json: bool) -> anyhow::Result<()> {
    let set = &session.profiles;
    if json {
        let rejected = set
            .rejections
            .iter()
            .map(|r| RejectedProfile {
                index: r.index,
                name: r.name.as_deref(),
                reason: r.reason.to_string(),
            })
            .collect();
        return render::print_json(&ShopsView {
            shops: &set.profiles,
            rejected,
        });
    }

    if set.profiles.is_empty() {
        println!(
            "no valid shops in {}",
            session.config.sites_path.display()
        );
    } else {
        println!("{:<24}{:<10}{:<12}BASE URL", "SHOP", "PAGES", "PARAM");
        for p in &set.profiles {
            println!(
                "{:<24}{:<10}{:<12}{}",
                render::truncate(&p.name, 23),
                format!("{}-{}", p.start_page, p.end_page),
                p.pagination_param.as_deref().unwrap_or("-"),
                p.base_url
            );
        }
    }

    for r in &set.rejections {
        println!(
            "rejected record {} ({}): {}",
            r.index,
            r.name.as_deref().unwrap_or("unnamed"),
            r.reason
        );
    }
    Ok(())
}

pub(crate) async fn run_deals(session: &Session, shop: &str, json: bool) -> anyhow::Result<()> {
    let profile = session.profile(shop)?;
    let scrape = session.scrape(profile).await?;

    if json {
        return render::print_json(&*scrape);
    }
    if scrape.listings.is_empty() {
        println!("no discounted listings found at {shop}");
        return Ok(());
    }
    println!(
        "{} listings at {shop} ({} pages)",
        scrape.listings.len(),
        scrape.pages_fetched
    );
    render::print_listings(&scrape.listings);
    Ok(())
}

pub(crate) async fn run_recommend(session: &Session, shop: &str, json: bool) -> anyhow::Result<()> {
    let profile = session.profile(shop)?;
    let scrape = session.scrape(profile).await?;
    let reference = session.reference()?;
    let recommendations = recommend(&scrape.listings, &reference);

    if json {
        let numbered: Vec<_> = recommendations
            .iter()
            .enumerate()
            .map(|(id, recommendation)| NumberedRecommendation { id, recommendation })
            .collect();
        return render::print_json(&numbered);
    }
    if recommendations.is_empty() {
        println!(
            "none of the {} listings at {shop} match the reference list",
            scrape.listings.len()
        );
        return Ok(());
    }
    println!("{} recommended albums at {shop}:", recommendations.len());
    render::print_recommendations(&recommendations);
    Ok(())
}
