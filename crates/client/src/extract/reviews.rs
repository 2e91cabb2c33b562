//! Critic review table extractor.

use gamescrape_core::records::ReviewEntry;
use scraper::Html;

use crate::document::{href, selector, text_of};

/// Critic reviews from the body of the `release` table, one entry per row.
///
/// The third cell holds the site's own rating, usually as a link to the
/// review; the fourth holds the rating scaled to a percentage. Rows with
/// fewer than four cells are skipped.
pub fn extract_reviews(page: &Html) -> Vec<ReviewEntry> {
    let mut reviews = Vec::new();

    for row in page.select(selector!("table.release tbody tr")) {
        let cells: Vec<_> = row.select(selector!("td")).collect();
        if cells.len() < 4 {
            tracing::debug!(cells = cells.len(), "skipping short review row");
            continue;
        }

        let link = cells[2].select(selector!("a[href]")).next();
        let site_rating = match link {
            Some(link) => text_of(link),
            None => text_of(cells[2]),
        };

        reviews.push(ReviewEntry {
            site: text_of(cells[0]).trim().to_string(),
            date: text_of(cells[1]).trim().to_string(),
            link: link.and_then(href).map(String::from),
            site_rating: site_rating.trim().to_string(),
            ratio: text_of(cells[3]).trim().to_string(),
        });
    }

    reviews
}
