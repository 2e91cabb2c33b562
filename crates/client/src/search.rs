//! Lazy, page-by-page search.
//!
//! Each call to [`SearchPages::next_page`] performs at most one fetch and
//! one extraction. The sequence ends in one of three ways:
//!
//! 1. A successful page shows the provider's "no results" marker: a clean end.
//! 2. `max_pages` pages have been yielded: a clean end, without fetching.
//! 3. A page answers with a non-success status: `SearchFailed`, whatever
//!    the error page renders.
//!
//! Batches already yielded stay valid after a failure. The sequence is
//! fused: once it has ended every further call reports `Finished`.

use futures_util::Stream;
use scraper::Html;
use std::sync::Arc;

use gamescrape_core::{Error, Result};

use crate::document::{self, sel, text_of};
use crate::fetch::{Fetcher, Headers, canonicalize, fill_template, search_query};

/// Why a search sequence ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// The provider reported that there are no (further) results.
    NoMoreResults,
    /// The requested number of pages was reached.
    PageLimit,
    /// The consumer stopped the sequence, or it already ended with an error.
    Aborted,
}

/// Result of advancing a search sequence by one page.
#[derive(Debug)]
pub enum PageOutcome<T> {
    Batch(Vec<T>),
    Finished(FinishReason),
    Failed(Error),
}

/// Element a provider renders in place of results when a search is exhausted.
#[derive(Debug, Clone, Copy)]
pub struct NoResultsMarker {
    pub selector: &'static str,
    /// Text the element's trimmed content must start with; any text matches
    /// when `None`.
    pub message: Option<&'static str>,
}

impl NoResultsMarker {
    pub fn matches(&self, page: &Html) -> bool {
        page.select(&sel(self.selector)).any(|found| match self.message {
            Some(message) => text_of(found).trim().starts_with(message),
            None => true,
        })
    }
}

/// One provider's search protocol.
///
/// `template` takes `{base}`, `{query}` and `{page}` placeholders; pages are
/// numbered from 0.
pub struct SearchSpec<T> {
    pub template: &'static str,
    /// Token that replaces whitespace in the query.
    pub separator: &'static str,
    pub marker: NoResultsMarker,
    pub extract: fn(&Html) -> Vec<T>,
}

/// A lazily fetched sequence of search result batches.
pub struct SearchPages<T> {
    fetcher: Arc<dyn Fetcher>,
    headers: Headers,
    spec: SearchSpec<T>,
    base_url: String,
    query: String,
    max_pages: Option<usize>,
    page: usize,
    finished: Option<FinishReason>,
}

impl<T> SearchPages<T> {
    /// Prepare a search; nothing is fetched until the first `next_page`.
    pub fn new(
        fetcher: Arc<dyn Fetcher>, headers: Headers, spec: SearchSpec<T>, base_url: &str, query: &str,
        max_pages: Option<usize>,
    ) -> Self {
        let query = search_query(query, spec.separator);
        Self {
            fetcher,
            headers,
            spec,
            base_url: base_url.trim_end_matches('/').to_string(),
            query,
            max_pages,
            page: 0,
            finished: None,
        }
    }

    /// The normalized query as it appears in page URLs.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Number of batches yielded so far.
    pub fn pages_fetched(&self) -> usize {
        self.page
    }

    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }

    /// Stop the sequence; no further pages are fetched.
    pub fn abort(&mut self) {
        self.finished.get_or_insert(FinishReason::Aborted);
    }

    /// Fetch and extract the next page.
    pub async fn next_page(&mut self) -> PageOutcome<T> {
        if let Some(reason) = self.finished {
            return PageOutcome::Finished(reason);
        }

        if let Some(max) = self.max_pages
            && self.page >= max
        {
            tracing::info!(query = %self.query, pages = self.page, "search reached page limit");
            return self.finish(FinishReason::PageLimit);
        }

        match self.fetch_page().await {
            Ok(Some(batch)) => {
                self.page += 1;
                tracing::debug!(query = %self.query, page = self.page, results = batch.len(), "search page extracted");
                PageOutcome::Batch(batch)
            }
            Ok(None) => {
                tracing::info!(query = %self.query, pages = self.page, "search exhausted");
                self.finish(FinishReason::NoMoreResults)
            }
            Err(err) => {
                self.finished = Some(FinishReason::Aborted);
                PageOutcome::Failed(err)
            }
        }
    }

    fn finish(&mut self, reason: FinishReason) -> PageOutcome<T> {
        self.finished = Some(reason);
        PageOutcome::Finished(reason)
    }

    /// `None` once the provider has no further results.
    async fn fetch_page(&self) -> Result<Option<Vec<T>>> {
        let page = self.page.to_string();
        let url = fill_template(self.spec.template, &[
            ("base", self.base_url.as_str()),
            ("query", self.query.as_str()),
            ("page", page.as_str()),
        ]);
        let url = canonicalize(&url)?;

        let response = self.fetcher.fetch(&url, &self.headers).await?;
        if !response.is_success() {
            tracing::warn!(url = %url, status = response.status, "search page returned non-success status");
            return Err(Error::SearchFailed { status: response.status });
        }

        match read_page(&self.spec, &response.body) {
            Some(batch) if !batch.is_empty() => Ok(Some(batch)),
            _ => Ok(None),
        }
    }

    /// Adapt the sequence to a stream of batches; it ends after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<T>>> {
        futures_util::stream::unfold(self, |mut pages| async move {
            match pages.next_page().await {
                PageOutcome::Batch(batch) => Some((Ok(batch), pages)),
                PageOutcome::Failed(err) => Some((Err(err), pages)),
                PageOutcome::Finished(_) => None,
            }
        })
    }
}

/// Parse a search page: `None` if it carries the marker, else its results.
fn read_page<T>(spec: &SearchSpec<T>, body: &str) -> Option<Vec<T>> {
    let page = document::parse(body);
    if spec.marker.matches(&page) {
        return None;
    }
    Some((spec.extract)(&page))
}
