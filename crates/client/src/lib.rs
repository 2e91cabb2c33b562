//! Client code for gamescrape.
//!
//! This crate provides the fetch gateway, the field extractors, per-game
//! sessions, paginated search and the two website models built on them.

pub mod document;
pub mod extract;
pub mod fetch;
pub mod provider;
pub mod search;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use fetch::{FetchConfig, FetchResponse, Fetcher, Headers, HttpFetcher};
pub use provider::{GameFaqs, GameRankings, Website};
pub use search::{FinishReason, NoResultsMarker, PageOutcome, SearchPages, SearchSpec};
pub use session::{CategoryFlags, PageTable, Session};
