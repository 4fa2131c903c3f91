//! Book catalog port
//!
//! Defines the interface for searching an external book catalog
//! (Google Books, test doubles, etc.)

use thiserror::Error;

use crate::domain::BookSummary;

/// Failure talking to the catalog service
///
/// Kept distinct from an empty result so callers can tell
/// "search failed" apart from "no books matched".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog request timed out")]
    Timeout,

    #[error("unable to reach the catalog service")]
    Unreachable,

    #[error("catalog returned HTTP {status}")]
    Http { status: u16 },

    #[error("unexpected catalog response: {0}")]
    Decode(String),

    #[error("catalog request failed: {0}")]
    Request(String),
}

impl CatalogError {
    /// Short label for the event log, free of request details
    pub fn category(&self) -> String {
        match self {
            CatalogError::Timeout => "catalog timeout".to_string(),
            CatalogError::Unreachable => "catalog unreachable".to_string(),
            CatalogError::Http { status } => format!("catalog http {}", status),
            CatalogError::Decode(_) => "catalog decode error".to_string(),
            CatalogError::Request(_) => "catalog request error".to_string(),
        }
    }
}

/// Book search provider
pub trait BookCatalog: Send + Sync {
    /// Provider name (e.g., "google_books")
    fn name(&self) -> &str;

    /// Search books in a category, optionally narrowed by a topic
    ///
    /// An empty vector means the search succeeded with no matches.
    fn search(&self, category: &str, topic: &str) -> Result<Vec<BookSummary>, CatalogError>;
}
