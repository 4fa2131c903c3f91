//! Result and error types for the core library

use thiserror::Error;

use crate::ports::CatalogError;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(String),

    /// Favorites document could not be read, parsed or written
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Error kind without the message, which may carry user input
    pub fn category(&self) -> String {
        match self {
            Self::Catalog(e) => e.category(),
            Self::Database(_) => "database error".to_string(),
            Self::Storage(_) => "storage error".to_string(),
            Self::NotFound(_) => "not found".to_string(),
            Self::Validation(_) => "invalid input".to_string(),
            Self::Conflict(_) => "conflict".to_string(),
            Self::Config(_) => "configuration error".to_string(),
            Self::Io(_) => "io error".to_string(),
            Self::Json(_) => "json error".to_string(),
        }
    }
}

impl From<duckdb::Error> for Error {
    fn from(e: duckdb::Error) -> Self {
        Self::Database(e.to_string())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::validation("title is required");
        assert_eq!(err.to_string(), "Validation error: title is required");

        let err = Error::storage("disk full");
        assert!(err.to_string().starts_with("Storage error"));
    }

    #[test]
    fn test_catalog_error_converts() {
        let err: Error = CatalogError::Timeout.into();
        assert!(matches!(err, Error::Catalog(CatalogError::Timeout)));
    }

    #[test]
    fn test_category_drops_message() {
        let err = Error::Conflict("username 'ada' is already taken".to_string());
        assert_eq!(err.category(), "conflict");

        let err: Error = CatalogError::Request("http://x/volumes?key=SECRET".to_string()).into();
        assert_eq!(err.category(), "catalog request error");

        let err: Error = CatalogError::Http { status: 429 }.into();
        assert_eq!(err.category(), "catalog http 429");
    }
}
