//! GameFAQs: game information, versions, add-ons and Q&A.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

use gamescrape_core::records::{
    AdvancedInfo, AllQuestions, BaseInfo, DlcEntry, FieldFailure, FieldMap, FullBaseInfo, FullGameInfo, PlatformEntry,
    QuestionDetail, QuestionTopic, Record, SearchResult, UserRating, VersionEntry,
};
use gamescrape_core::{AppConfig, Category, Error, Result};

use super::{Site, Website, http_fetcher};
use crate::extract;
use crate::fetch::{Fetcher, Headers, canonicalize, fill_template, path_segment};
use crate::search::{NoResultsMarker, SearchPages, SearchSpec};
use crate::session::{CategoryFlags, PageTable};

const NAME: &str = "gamefaqs";

const PAGES: PageTable = PageTable {
    provider: NAME,
    pages: &[
        (Category::Base, "/"),
        (Category::Advanced, "/data"),
        (Category::QuestionsAnswered, "/answers/answered"),
        (Category::QuestionsUnresolved, "/answers/unresolved"),
    ],
};

const LISTING_TEMPLATE: &str = "{base}/{platform}/category/999-all?page={page}";

fn search_spec() -> SearchSpec<SearchResult> {
    SearchSpec {
        template: "{base}/search?game={query}&page={page}",
        separator: "+",
        marker: NoResultsMarker { selector: "div.error", message: Some("No results found") },
        extract: extract::extract_search_results,
    }
}

/// Game information provider.
///
/// Every extraction operation reads the page of its category from the open
/// session and fails with `MissingResponse` when that page was not fetched.
pub struct GameFaqs {
    site: Site,
    max_listing_pages: usize,
}

impl GameFaqs {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: &AppConfig) -> Self {
        Self { site: Site::new(fetcher, &config.gamefaqs_url, PAGES), max_listing_pages: config.max_listing_pages }
    }

    /// Create a provider talking HTTP as described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(http_fetcher(config)?, config))
    }

    /// Base and advanced pages, without the Q&A listings.
    pub fn default_flags() -> CategoryFlags {
        CategoryFlags::new()
            .enable(Category::Base)
            .enable(Category::Advanced)
            .with(Category::QuestionsAnswered, false)
            .with(Category::QuestionsUnresolved, false)
    }

    pub fn name(&mut self) -> Result<Option<String>> {
        self.site.extract(Category::Base, |page| Ok(extract::extract_name(page)))
    }

    pub fn description(&mut self) -> Result<Option<String>> {
        self.site.extract(Category::Base, |page| Ok(extract::extract_description(page)))
    }

    /// Platforms, developer, release date, franchise, ESRB and Metacritic.
    pub fn base_info(&mut self) -> Result<BaseInfo> {
        self.site.extract(Category::Base, extract::extract_base_info)
    }

    pub fn user_ratings(&mut self) -> Result<Vec<UserRating>> {
        self.site.extract(Category::Base, |page| Ok(extract::extract_user_ratings(page)))
    }

    pub fn full_base_info(&mut self) -> Result<FullBaseInfo> {
        self.site.extract(Category::Base, |page| Ok(extract::extract_full_base_info(page)))
    }

    pub fn title_data(&mut self) -> Result<FieldMap> {
        self.site.extract(Category::Advanced, |page| Ok(extract::extract_title_data(page)))
    }

    pub fn versions(&mut self) -> Result<Vec<VersionEntry>> {
        self.site.extract(Category::Advanced, |page| Ok(extract::extract_versions(page)))
    }

    pub fn dlc(&mut self) -> Result<Vec<DlcEntry>> {
        self.site.extract(Category::Advanced, |page| Ok(extract::extract_dlc(page)))
    }

    pub fn full_advanced_info(&mut self) -> Result<AdvancedInfo> {
        self.site.extract(Category::Advanced, |page| Ok(extract::extract_advanced_info(page)))
    }

    /// Base and advanced information together. A part that cannot be
    /// extracted is left out and recorded in `failures`.
    pub fn full_game_info(&mut self) -> FullGameInfo {
        let mut failures = Vec::new();

        let base = match self.full_base_info() {
            Ok(base) => Some(base),
            Err(err) => {
                tracing::warn!(error = %err, "base info unavailable");
                failures.push(FieldFailure::new("Base-Info", &err));
                None
            }
        };

        let advanced = match self.full_advanced_info() {
            Ok(advanced) => Some(advanced),
            Err(err) => {
                tracing::warn!(error = %err, "advanced info unavailable");
                failures.push(FieldFailure::new("Advanced-Info", &err));
                None
            }
        };

        FullGameInfo { base, advanced, failures }
    }

    pub fn answered_questions(&mut self) -> Result<Vec<QuestionTopic>> {
        self.site.extract(Category::QuestionsAnswered, |page| Ok(extract::extract_questions(page)))
    }

    pub fn unresolved_questions(&mut self) -> Result<Vec<QuestionTopic>> {
        self.site.extract(Category::QuestionsUnresolved, |page| Ok(extract::extract_questions(page)))
    }

    /// Both Q&A listings; requires both to be in the session.
    pub fn all_questions(&mut self) -> Result<AllQuestions> {
        Ok(AllQuestions { answered: self.answered_questions()?, unresolved: self.unresolved_questions()? })
    }

    /// Question text and answers, fetched from `link` independently of the session.
    pub async fn answers(&self, link: &str) -> Result<QuestionDetail> {
        self.site.fetch_link(link, extract::extract_question_detail).await
    }

    /// Every game listed for `platform` (e.g. `snes`).
    ///
    /// Listing pages are walked until one adds no new entry, or until the
    /// configured page cap.
    ///
    /// # Errors
    ///
    /// `InvalidUrl` if `platform` is not a plain slug, `NoEntriesFound` if
    /// the first page lists nothing; fetch errors as usual.
    pub async fn list_platform(&self, platform: &str) -> Result<Vec<PlatformEntry>> {
        let platform = path_segment(platform)?;
        let mut entries = Vec::new();
        let mut seen = HashSet::new();

        for page in 0..self.max_listing_pages {
            let page = page.to_string();
            let url = canonicalize(&fill_template(LISTING_TEMPLATE, &[
                ("base", self.site.base_url()),
                ("platform", platform),
                ("page", page.as_str()),
            ]))?;

            let listed = self.site.fetch_url(&url, |doc| Ok(extract::extract_platform_listing(doc))).await?;
            let fresh: Vec<PlatformEntry> = listed.into_iter().filter(|entry| seen.insert(entry.link.clone())).collect();
            if fresh.is_empty() {
                break;
            }
            entries.extend(fresh);
        }

        if entries.is_empty() {
            return Err(Error::NoEntriesFound { platform: platform.to_string() });
        }

        tracing::info!(platform, entries = entries.len(), "platform listing complete");
        Ok(entries)
    }
}

#[async_trait]
impl Website for GameFaqs {
    type SearchHit = SearchResult;

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
            Category::Base => self.full_base_info().map(Record::Base),
            Category::Advanced => self.full_advanced_info().map(Record::Advanced),
            Category::QuestionsAnswered => self.answered_questions().map(Record::Questions),
            Category::QuestionsUnresolved => self.unresolved_questions().map(Record::Questions),
            Category::Reviews => Err(Error::UnsupportedCategory { provider: NAME.to_string(), category }),
        }
    }

    fn search(&self, query: &str, max_pages: Option<usize>) -> SearchPages<SearchResult> {
        self.site.search(search_spec(), query, max_pages)
    }
}
