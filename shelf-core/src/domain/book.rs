//! Book domain models
//!
//! `BookSummary` is what the catalog returns, `FavoriteBook` is a summary
//! plus the per-user reading state, and `FavoritesDocument` is the single
//! persisted structure holding every user's favorites.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};
use super::user::UserId;

/// Category used when none is supplied
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// A search result from the book catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: String,
    pub category: String,
}

/// A bookmarked book with reading progress and notes
///
/// Field order matches the on-disk document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub learning: String,
}

impl FavoriteBook {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: impl Into<String>,
        category: Option<&str>,
    ) -> Self {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .unwrap_or_else(default_category);

        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            publication_year: publication_year.into(),
            category,
            current_page: 0,
            learning: String::new(),
        }
    }

    /// Check that the identifying fields are present
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("isbn", &self.isbn),
            ("title", &self.title),
            ("author", &self.author),
            ("publication_year", &self.publication_year),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(format!(
                "missing data for book: {}",
                missing.join(", ")
            )))
        }
    }
}

impl From<BookSummary> for FavoriteBook {
    fn from(summary: BookSummary) -> Self {
        Self::new(
            summary.isbn,
            summary.title,
            summary.author,
            summary.publication_year,
            Some(&summary.category),
        )
    }
}

/// Mapping from user id to that user's ordered favorites
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesDocument {
    users: BTreeMap<String, Vec<FavoriteBook>>,
}

impl FavoritesDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Number of user lists in the document
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Total favorites across all users
    pub fn favorite_count(&self) -> usize {
        self.users.values().map(Vec::len).sum()
    }

    /// A user's favorites, empty when the user has none
    pub fn favorites(&self, user_id: UserId) -> &[FavoriteBook] {
        self.users
            .get(&user_id.document_key())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Mutable list for a user, created on first access
    pub fn favorites_mut(&mut self, user_id: UserId) -> &mut Vec<FavoriteBook> {
        self.users.entry(user_id.document_key()).or_default()
    }

    /// Mutable list for a user, without creating one
    pub fn existing_favorites_mut(&mut self, user_id: UserId) -> Option<&mut Vec<FavoriteBook>> {
        self.users.get_mut(&user_id.document_key())
    }

    /// Iterate user keys and their lists in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FavoriteBook])> {
        self.users.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Result flag for favorites mutations
///
/// Lets callers tell a write apart from a no-op instead of silently
/// succeeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOutcome {
    /// The document was changed and persisted
    Applied,
    /// No book with the given isbn exists in the user's list
    NotFound,
    /// The user's list already holds a book with this isbn
    Duplicate,
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Parse a page number submitted as text
pub fn parse_page(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    trimmed
        .parse::<u32>()
        .map_err(|_| Error::validation(format!("invalid page number: '{}'", trimmed)))
}
