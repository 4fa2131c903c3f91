//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod catalog;
mod repository;

pub use catalog::{BookCatalog, CatalogError};
pub use repository::{CredentialStore, FavoritesStore};
