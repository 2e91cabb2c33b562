//! Identifiers for the independently fetched pages of one game.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named subset of a game's information, fetched and parsed on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Landing page: description, platforms, ratings.
    Base,
    /// Data page: title data, versions, add-ons.
    Advanced,
    /// Answered Q&A listing.
    QuestionsAnswered,
    /// Unresolved Q&A listing.
    QuestionsUnresolved,
    /// Critic review aggregate.
    Reviews,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Base,
        Category::Advanced,
        Category::QuestionsAnswered,
        Category::QuestionsUnresolved,
        Category::Reviews,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Base => "base",
            Category::Advanced => "advanced",
            Category::QuestionsAnswered => "questions_answered",
            Category::QuestionsUnresolved => "questions_unresolved",
            Category::Reviews => "reviews",
        }
    }

    /// Look up a category by its snake_case name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name.trim())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
