//! Shelf Core - personal library: accounts, book search and favorites
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (User, FavoriteBook, FavoritesDocument, etc.)
//! - **ports**: Trait definitions for external dependencies (CredentialStore,
//!   BookCatalog, FavoritesStore)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, Google Books, JSON file)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;
pub mod migrations;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use adapters::duckdb::{DuckDbUserStore, DB_FILENAME};
use adapters::google_books::GoogleBooksClient;
use adapters::json_favorites::JsonFavoritesStore;
use config::Config;
use ports::BookCatalog;
use services::*;

// Re-export commonly used types at crate root
pub use domain::{
    parse_page, BookSummary, FavoriteBook, FavoritesDocument, MutationOutcome, Session, User,
    UserId,
};
pub use domain::result::{Error, Result};
pub use ports::{CatalogError, CredentialStore, FavoritesStore};

/// Main context for shelf operations
///
/// Holds the configuration, the three stores and the services built on
/// them, all rooted at one data directory.
pub struct ShelfContext {
    pub data_dir: PathBuf,
    pub config: Config,
    pub users: Arc<DuckDbUserStore>,
    pub favorites: Arc<JsonFavoritesStore>,
    pub catalog: Arc<dyn BookCatalog>,
    pub session_service: SessionService,
    pub search_service: SearchService,
    pub status_service: StatusService,
}

impl ShelfContext {
    /// Open (or initialize) the library in `data_dir`
    pub fn new(data_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;

        let config = Config::load(data_dir)?;
        let catalog: Arc<dyn BookCatalog> =
            Arc::new(GoogleBooksClient::from_settings(&config.catalog)?);

        Self::with_catalog(data_dir, config, catalog)
    }

    /// Build a context around a caller-supplied catalog
    pub fn with_catalog(
        data_dir: &Path,
        config: Config,
        catalog: Arc<dyn BookCatalog>,
    ) -> anyhow::Result<Self> {
        let users = Arc::new(DuckDbUserStore::new(&data_dir.join(DB_FILENAME))?);
        users.ensure_schema()?;

        let favorites = Arc::new(JsonFavoritesStore::in_dir(data_dir));

        let session_service = SessionService::new(users.clone(), data_dir);
        let search_service = SearchService::new(Arc::clone(&catalog));
        let status_service =
            StatusService::new(users.clone(), favorites.clone(), favorites.path());

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            config,
            users,
            favorites,
            catalog,
            session_service,
            search_service,
            status_service,
        })
    }
}
