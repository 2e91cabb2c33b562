//! Website models: one provider's URLs, pages and extractors behind a
//! uniform capability surface.
//!
//! ### Capabilities
//! - `configure`: headers sent with every request of this provider.
//! - `open_session` / `close_session`: fetch or release one game's pages.
//! - `extract`: the full record of one category from the open session.
//! - `search`: a lazy sequence of result batches.

pub mod gamefaqs;
pub mod gamerankings;

pub use gamefaqs::GameFaqs;
pub use gamerankings::GameRankings;

use async_trait::async_trait;
use scraper::Html;
use std::sync::Arc;

use gamescrape_core::records::Record;
use gamescrape_core::{AppConfig, Category, Error, Result};

use crate::fetch::{FetchConfig, Fetcher, Headers, HttpFetcher, page_url};
use crate::search::{SearchPages, SearchSpec};
use crate::session::{self, CategoryFlags, PageTable, Session};

/// A content provider.
#[async_trait]
pub trait Website: Send + Sync {
    /// Shape of one search result.
    type SearchHit: Send;

    /// Short provider name used in errors and logs.
    fn provider(&self) -> &'static str;

    /// Replace the provider-level request headers.
    fn configure(&mut self, headers: Headers);

    /// Fetch the enabled categories of the game at `path`, replacing any
    /// open session.
    async fn open_session(&mut self, path: &str, flags: &CategoryFlags) -> Result<()>;

    /// Release the open session, if any.
    fn close_session(&mut self);

    /// Full record for `category` from the open session.
    fn extract(&mut self, category: Category) -> Result<Record>;

    /// Search with `query`, yielding at most `max_pages` batches.
    fn search(&self, query: &str, max_pages: Option<usize>) -> SearchPages<Self::SearchHit>;
}

/// State shared by every provider: transport, base URL, headers and the
/// open session.
pub(crate) struct Site {
    fetcher: Arc<dyn Fetcher>,
    base_url: String,
    headers: Headers,
    table: PageTable,
    session: Option<Session>,
}

impl Site {
    pub(crate) fn new(fetcher: Arc<dyn Fetcher>, base_url: &str, table: PageTable) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: Headers::new(),
            table,
            session: None,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn configure(&mut self, headers: Headers) {
        self.headers = headers;
    }

    pub(crate) async fn open(&mut self, path: &str, flags: &CategoryFlags) -> Result<()> {
        self.close();
        let session = Session::open(self.fetcher.as_ref(), &self.headers, &self.table, &self.base_url, path, flags).await?;
        self.session = Some(session);
        Ok(())
    }

    pub(crate) fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.close();
        }
    }

    /// Extract from the open session; with no session every category is missing.
    pub(crate) fn extract<T>(&mut self, category: Category, extractor: impl FnOnce(&Html) -> Result<T>) -> Result<T> {
        match self.session.as_mut() {
            Some(session) => session.extract(category, extractor),
            None => Err(Error::MissingResponse { category }),
        }
    }

    /// Fetch one page by its site-relative link, outside the session.
    pub(crate) async fn fetch_link<T>(&self, link: &str, extractor: impl FnOnce(&Html) -> Result<T>) -> Result<T> {
        let url = page_url(&self.base_url, link, "")?;
        session::fetch_and_extract(self.fetcher.as_ref(), &self.headers, &url, extractor).await
    }

    pub(crate) async fn fetch_url<T>(&self, url: &url::Url, extractor: impl FnOnce(&Html) -> Result<T>) -> Result<T> {
        session::fetch_and_extract(self.fetcher.as_ref(), &self.headers, url, extractor).await
    }

    pub(crate) fn search<T>(&self, spec: SearchSpec<T>, query: &str, max_pages: Option<usize>) -> SearchPages<T> {
        SearchPages::new(self.fetcher.clone(), self.headers.clone(), spec, &self.base_url, query, max_pages)
    }
}

/// Build the HTTP transport described by `config`.
pub(crate) fn http_fetcher(config: &AppConfig) -> Result<Arc<dyn Fetcher>> {
    Ok(Arc::new(HttpFetcher::new(FetchConfig::from(config))?))
}
