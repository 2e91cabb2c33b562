//! Per-game sessions: one fetched page per requested category.
//!
//! ### Lifecycle
//! - `open` fetches every enabled category's page, one request at a time.
//! - `extract` validates the category's slot, parses the stored body once
//!   and hands the document to an extractor.
//! - `close` releases every stored body; it is idempotent and also runs
//!   when the session is dropped.
//!
//! A page that answered with a non-success status is reported when it is
//! first extracted; its body is released at that point.

use scraper::Html;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use gamescrape_core::{Category, Error, Result};

use crate::document;
use crate::fetch::{FetchResponse, Fetcher, Headers, page_url};

/// Which categories a session should fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryFlags(BTreeMap<Category, bool>);

impl CategoryFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag for one category.
    pub fn with(mut self, category: Category, enabled: bool) -> Self {
        self.0.insert(category, enabled);
        self
    }

    pub fn enable(self, category: Category) -> Self {
        self.with(category, true)
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        self.0.get(&category).copied().unwrap_or(false)
    }

    /// Every flagged category with its flag, in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, bool)> + '_ {
        self.0.iter().map(|(category, enabled)| (*category, *enabled))
    }
}

impl FromIterator<Category> for CategoryFlags {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self(iter.into_iter().map(|category| (category, true)).collect())
    }
}

/// A provider's category to path-suffix table.
#[derive(Debug, Clone, Copy)]
pub struct PageTable {
    /// Provider name used in errors and logs.
    pub provider: &'static str,
    pub pages: &'static [(Category, &'static str)],
}

impl PageTable {
    pub fn suffix(&self, category: Category) -> Option<&'static str> {
        self.pages
            .iter()
            .find(|(candidate, _)| *candidate == category)
            .map(|(_, suffix)| *suffix)
    }

    pub fn supports(&self, category: Category) -> bool {
        self.suffix(category).is_some()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.pages.iter().map(|(category, _)| *category)
    }
}

enum Slot {
    Fetched(FetchResponse),
    Skipped,
    Failed { url: String, status: u16 },
}

/// Pages fetched for one game, keyed by category.
pub struct Session {
    provider: &'static str,
    slots: BTreeMap<Category, Slot>,
    closed: bool,
}

impl Session {
    /// Fetch `base + path + suffix` for every enabled category.
    ///
    /// Categories flagged `false` are recorded as skipped and fail to
    /// extract with `MissingResponse`.
    ///
    /// # Errors
    ///
    /// `UnsupportedCategory` if an enabled category has no page in `table`
    /// (checked before any request is made), `InvalidUrl` for a malformed
    /// page URL, and any transport error from the fetcher.
    pub async fn open(
        fetcher: &dyn Fetcher, headers: &Headers, table: &PageTable, base_url: &str, path: &str,
        flags: &CategoryFlags,
    ) -> Result<Self> {
        let mut targets = Vec::new();
        for (category, enabled) in flags.iter() {
            if !enabled {
                continue;
            }
            let suffix = table
                .suffix(category)
                .ok_or_else(|| Error::UnsupportedCategory { provider: table.provider.to_string(), category })?;
            targets.push((category, page_url(base_url, path, suffix)?));
        }

        let mut session = Session { provider: table.provider, slots: BTreeMap::new(), closed: false };
        for (category, _) in flags.iter() {
            session.slots.insert(category, Slot::Skipped);
        }

        for (category, url) in targets {
            let response = fetcher.fetch(&url, headers).await?;
            if !response.is_success() {
                tracing::warn!(provider = table.provider, category = %category, url = %url, status = response.status, "page fetch returned non-success status");
            }
            session.slots.insert(category, Slot::Fetched(response));
        }

        tracing::debug!(provider = table.provider, path, pages = session.fetched(), "session opened");
        Ok(session)
    }

    /// Whether the session holds a fetched page for `category`.
    pub fn contains(&self, category: Category) -> bool {
        matches!(self.slots.get(&category), Some(Slot::Fetched(_)))
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn fetched(&self) -> usize {
        self.slots.values().filter(|slot| matches!(slot, Slot::Fetched(_))).count()
    }

    /// Run `extractor` over the page stored for `category`.
    ///
    /// # Errors
    ///
    /// `MissingResponse` if the category was not fetched (or the session is
    /// closed), `FetchFailed` if its page answered with a non-success
    /// status, otherwise whatever the extractor returns.
    pub fn extract<T>(&mut self, category: Category, extractor: impl FnOnce(&Html) -> Result<T>) -> Result<T> {
        let slot = self.slots.get_mut(&category).ok_or(Error::MissingResponse { category })?;

        let page = match slot {
            Slot::Fetched(response) if response.is_success() => document::parse(&response.body),
            Slot::Fetched(response) => {
                let (url, status) = (response.url.to_string(), response.status);
                *slot = Slot::Failed { url: url.clone(), status };
                return Err(Error::FetchFailed { url, status });
            }
            Slot::Failed { url, status } => return Err(Error::FetchFailed { url: url.clone(), status: *status }),
            Slot::Skipped => return Err(Error::MissingResponse { category }),
        };

        let record = extractor(&page)?;
        tracing::debug!(provider = self.provider, category = %category, "extracted page");
        Ok(record)
    }

    /// Release every stored page. Safe to call any number of times.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        let released = self.fetched();
        self.slots.clear();
        self.closed = true;
        tracing::debug!(provider = self.provider, released, "session closed");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

/// Fetch a single page outside any session and extract it.
///
/// # Errors
///
/// `FetchFailed` on a non-success status, otherwise as [`Session::extract`].
pub async fn fetch_and_extract<T>(
    fetcher: &dyn Fetcher, headers: &Headers, url: &url::Url, extractor: impl FnOnce(&Html) -> Result<T>,
) -> Result<T> {
    let response = fetcher.fetch(url, headers).await?;
    if !response.is_success() {
        tracing::warn!(url = %url, status = response.status, "page fetch returned non-success status");
        return Err(Error::FetchFailed { url: url.to_string(), status: response.status });
    }

    let page = document::parse(&response.body);
    extractor(&page)
}
