//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod book;
mod credential;
mod session;
mod user;
pub mod result;

pub use book::{
    parse_page, BookSummary, FavoriteBook, FavoritesDocument, MutationOutcome, DEFAULT_CATEGORY,
};
pub use credential::{Argon2Params, PasswordDigest};
pub use session::Session;
pub use user::{User, UserId};
