//! Search result and platform listing extractors.
//!
//! Results are returned in document order.

use gamescrape_core::records::{ConsolePlatform, PlatformEntry, RankingResult, SearchResult};
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

use crate::document::{first_text, href, segment_info, selector, text_of};

/// Average rating immediately followed by the review count, e.g. `85.50%12`.
static RANKING_REVIEWS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,3}\.\d{2}%|n/a|n\\a)(\d+)").expect("valid ranking pattern"));

/// One page of game-information search results.
///
/// Titles and details are sibling lists paired by position. The info line
/// reads `company, genre, year`, where the company part may itself contain
/// commas.
pub fn extract_search_results(page: &Html) -> Vec<SearchResult> {
    let titles = page.select(selector!("div.sr_title"));
    let details = page.select(selector!("div.sr_details"));

    titles
        .zip(details)
        .filter_map(|(title, detail)| {
            let Some(link) = title.select(selector!("a.sevent[href]")).next() else {
                tracing::debug!("skipping search result without title link");
                return None;
            };

            let segments = first_text(title, selector!("div.sr_info")).map(|info| segment_info(&info, ","));
            let segments = segments.unwrap_or_default();

            let consoles = detail
                .select(selector!("div.sr_product_name"))
                .filter_map(|product| {
                    let target = product.select(selector!("a[href]")).next().and_then(href)?;
                    Some(ConsolePlatform { name: text_of(product).trim().to_string(), link: target.to_string() })
                })
                .collect();

            Some(SearchResult {
                name: text_of(link).trim().to_string(),
                link: href(link)?.to_string(),
                genre: segments.category,
                company: segments.remainder,
                year: segments.year,
                consoles,
            })
        })
        .collect()
}

/// One page of review-aggregator search results.
///
/// The result table has no classes and packs several facts per cell
/// separated by line breaks; rows are read as the flat list of non-blank
/// lines: console, name, `company, year`, `rating` + `count`.
pub fn extract_ranking_results(page: &Html) -> Vec<RankingResult> {
    let mut results = Vec::new();

    for row in page.select(selector!("tr")) {
        let segments: Vec<String> = row
            .select(selector!("td"))
            .flat_map(|cell| {
                text_of(cell)
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .collect();

        if segments.len() < 4 {
            tracing::debug!(segments = segments.len(), "skipping short ranking row");
            continue;
        }

        let (company, year) = match segments[2].rsplit_once(',') {
            Some((company, year)) => (Some(company.trim().to_string()), Some(year.trim().to_string())),
            None => (Some(segments[2].clone()), None),
        };

        let reviews = RANKING_REVIEWS.captures(&segments[3]);

        results.push(RankingResult {
            console: segments[0].clone(),
            name: segments[1].clone(),
            link: row.select(selector!("a[href]")).next().and_then(href).map(String::from),
            company,
            year,
            rating: reviews.as_ref().and_then(|c| c.get(1)).map(|m| m.as_str().to_string()),
            review_count: reviews.as_ref().and_then(|c| c.get(2)).and_then(|m| m.as_str().parse().ok()),
        });
    }

    results
}

/// Games on one page of a platform's full listing.
pub fn extract_platform_listing(page: &Html) -> Vec<PlatformEntry> {
    page.select(selector!("td.rtitle a[href]"))
        .filter_map(|link| {
            Some(PlatformEntry { name: text_of(link).trim().to_string(), link: href(link)?.to_string() })
        })
        .collect()
}
