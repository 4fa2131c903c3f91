//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the CredentialStore port
//! - Google Books HTTP client for the BookCatalog port
//! - A single JSON document for the FavoritesStore port

pub mod duckdb;
pub mod google_books;
pub mod json_favorites;

#[cfg(test)]
pub mod google_books_mock;
