//! Unified error types for gamescrape.

use crate::category::Category;
use crate::config::ConfigError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error types for sessions, extraction and search.
///
/// The provider's "no more results" marker is not represented here: it ends a
/// search sequence normally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Extraction requested for a category the session never fetched.
    #[error("MISSING_RESPONSE: no {category} page in the current session")]
    MissingResponse { category: Category },

    /// A required page answered with a non-success status.
    #[error("FETCH_FAILED: {url} returned status {status}")]
    FetchFailed { url: String, status: u16 },

    /// A search page answered with a non-success status.
    #[error("SEARCH_FAILED: search page returned status {status}")]
    SearchFailed { status: u16 },

    /// Content could not be decomposed by the field's heuristic.
    #[error("MALFORMED_FIELD: {field}: {reason}")]
    MalformedField { field: String, reason: String },

    /// Platform enumeration found nothing on its first page.
    #[error("NO_ENTRIES_FOUND: no entries listed for platform {platform}")]
    NoEntriesFound { platform: String },

    /// The provider has no page for the requested category.
    #[error("UNSUPPORTED_CATEGORY: {provider} has no {category} page")]
    UnsupportedCategory { provider: String, category: Category },

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Network-level failure before a status was received.
    #[error("TRANSPORT: {0}")]
    Transport(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Configuration could not be loaded or validated.
    #[error("CONFIG: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedField { field: field.into(), reason: reason.into() }
    }

    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MissingResponse { .. } => "MISSING_RESPONSE",
            Error::FetchFailed { .. } => "FETCH_FAILED",
            Error::SearchFailed { .. } => "SEARCH_FAILED",
            Error::MalformedField { .. } => "MALFORMED_FIELD",
            Error::NoEntriesFound { .. } => "NO_ENTRIES_FOUND",
            Error::UnsupportedCategory { .. } => "UNSUPPORTED_CATEGORY",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::Transport(_) => "TRANSPORT",
            Error::FetchTooLarge(_) => "FETCH_TOO_LARGE",
            Error::Config(_) => "CONFIG",
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::FetchFailed { status, .. } | Error::SearchFailed { status } => Some(*status),
            _ => None,
        }
    }
}
