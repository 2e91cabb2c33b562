//! Field extractors for game pages and search result pages.
//!
//! Every extractor is a pure function over a parsed document. Absent
//! elements yield absent or empty results rather than errors; only fields
//! whose text cannot be interpreted fail, with `MalformedField`.
//!
//! ### Game information
//! - [`game`]: name, description, the info pod, ESRB, Metacritic and user ratings.
//! - [`data`]: title data, versions and add-ons from the advanced page.
//! - [`answers`]: Q&A listings and question details.
//!
//! ### Listings
//! - [`listings`]: search results of both sites and platform listings.
//! - [`reviews`]: critic reviews.

pub mod answers;
pub mod data;
pub mod game;
pub mod listings;
pub mod reviews;

pub use answers::{extract_question_detail, extract_questions};
pub use data::{extract_advanced_info, extract_dlc, extract_title_data, extract_versions};
pub use game::{
    extract_base_info, extract_description, extract_full_base_info, extract_name, extract_user_ratings, parse_esrb,
};
pub use listings::{extract_platform_listing, extract_ranking_results, extract_search_results};
pub use reviews::extract_reviews;
