//! GameRankings: critic review aggregates.

use async_trait::async_trait;
use std::sync::Arc;

use gamescrape_core::records::{RankingResult, Record, ReviewEntry};
use gamescrape_core::{AppConfig, Category, Error, Result};

use super::{Site, Website, http_fetcher};
use crate::extract;
use crate::fetch::{Fetcher, Headers};
use crate::search::{NoResultsMarker, SearchPages, SearchSpec};
use crate::session::{CategoryFlags, PageTable};

const NAME: &str = "gamerankings";

const PAGES: PageTable = PageTable { provider: NAME, pages: &[(Category::Reviews, "/articles.html")] };

fn search_spec() -> SearchSpec<RankingResult> {
    SearchSpec {
        template: "{base}/browse.html?search={query}&numrev=3&page={page}",
        separator: "+",
        marker: NoResultsMarker { selector: "div.pod", message: Some("No results were found for your search.") },
        extract: extract::extract_ranking_results,
    }
}

/// Critic review provider.
pub struct GameRankings {
    site: Site,
}

impl GameRankings {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: &AppConfig) -> Self {
        Self { site: Site::new(fetcher, &config.gamerankings_url, PAGES) }
    }

    /// Create a provider talking HTTP as described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(http_fetcher(config)?, config))
    }

    pub fn default_flags() -> CategoryFlags {
        CategoryFlags::new().enable(Category::Reviews)
    }

    /// Site, date, site rating and normalized ratio of every review.
    pub fn reviews(&mut self) -> Result<Vec<ReviewEntry>> {
        self.site.extract(Category::Reviews, |page| Ok(extract::extract_reviews(page)))
    }
}

#[async_trait]
impl Website for GameRankings {
    type SearchHit = RankingResult;

    fn provider(&self) -> &'static str {
        NAME
    }

    fn configure(&mut self, headers: Headers) {
        self.site.configure(headers);
    }

    async fn open_session(&mut self, path: &str, flags: &CategoryFlags) -> Result<()> {
        self.site.open(path, flags).await
    }

    fn close_session(&mut self) {
        self.site.close();
    }

    fn extract(&mut self, category: Category) -> Result<Record> {
        match category {
            Category::Reviews => self.reviews().map(Record::Reviews),
            other => Err(Error::UnsupportedCategory { provider: NAME.to_string(), category: other }),
        }
    }

    fn search(&self, query: &str, max_pages: Option<usize>) -> SearchPages<RankingResult> {
        self.site.search(search_spec(), query, max_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{FinishReason, PageOutcome};
    use crate::testing::{RANKING_NO_RESULTS_PAGE, RANKING_SEARCH_PAGE, REVIEWS_PAGE, ScriptedFetcher};

    const GAME: &str = "/pc/914233-monty-pythons-complete-waste-of-time";

    fn rankings(fetcher: ScriptedFetcher) -> (Arc<ScriptedFetcher>, GameRankings) {
        let fetcher = Arc::new(fetcher);
        let config = AppConfig { gamerankings_url: "http://reviews.test/".into(), ..Default::default() };
        (fetcher.clone(), GameRankings::new(fetcher, &config))
    }

    #[tokio::test]
    async fn test_reviews_session() {
        let (fetcher, mut site) = rankings(ScriptedFetcher::new().page(REVIEWS_PAGE));

        site.open_session(GAME, &GameRankings::default_flags()).await.unwrap();

        assert_eq!(fetcher.requests(), vec![format!("http://reviews.test{GAME}/articles.html")]);
        assert_eq!(site.reviews().unwrap().len(), 2);
        match site.extract(Category::Reviews).unwrap() {
            Record::Reviews(reviews) => assert_eq!(reviews[0].site, "PC Gamer"),
            other => panic!("unexpected record {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unsupported_categories() {
        let (fetcher, mut site) = rankings(ScriptedFetcher::new());

        let result = site.open_session(GAME, &CategoryFlags::new().enable(Category::Base)).await;

        assert!(matches!(result, Err(Error::UnsupportedCategory { category: Category::Base, .. })));
        assert!(fetcher.requests().is_empty());
        assert!(matches!(site.extract(Category::Advanced), Err(Error::UnsupportedCategory { .. })));
    }

    #[tokio::test]
    async fn test_reviews_without_session() {
        let (_, mut site) = rankings(ScriptedFetcher::new());
        assert!(matches!(site.reviews(), Err(Error::MissingResponse { category: Category::Reviews })));
        site.close_session();
    }

    #[tokio::test]
    async fn test_search_until_marker() {
        let fetcher = ScriptedFetcher::new().page(RANKING_SEARCH_PAGE).page(RANKING_NO_RESULTS_PAGE);
        let (fetcher, site) = rankings(fetcher);

        let mut pages = site.search("monty python", None);

        match pages.next_page().await {
            PageOutcome::Batch(batch) => {
                assert_eq!(batch.len(), 2);
                assert_eq!(batch[0].rating.as_deref(), Some("72.50%"));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(matches!(pages.next_page().await, PageOutcome::Finished(FinishReason::NoMoreResults)));
        assert_eq!(fetcher.requests()[0], "http://reviews.test/browse.html?search=monty+python&numrev=3&page=0");
    }

    #[tokio::test]
    async fn test_search_failure() {
        let (_, site) = rankings(ScriptedFetcher::new().status(403, "Forbidden"));

        let mut pages = site.search("monty", Some(3));

        assert!(matches!(pages.next_page().await, PageOutcome::Failed(Error::SearchFailed { status: 403 })));
        assert!(matches!(pages.next_page().await, PageOutcome::Finished(_)));
    }
}
