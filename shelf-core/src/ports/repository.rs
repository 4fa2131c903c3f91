//! Storage ports - credential and favorites persistence

use std::collections::HashSet;

use crate::domain::result::Result;
use crate::domain::{FavoriteBook, FavoritesDocument, MutationOutcome, User, UserId};

/// User account storage
pub trait CredentialStore: Send + Sync {
    /// Create a user and return its id
    fn register(&self, username: &str, password: &str) -> Result<UserId>;

    /// Return the user when the username and password match
    fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>>;

    /// Look up a user by id
    fn get_user(&self, id: UserId) -> Result<Option<User>>;

    /// Number of registered users
    fn count_users(&self) -> Result<u64>;
}

/// Per-user favorites storage
///
/// Every mutation is a whole-document read-modify-write. Implementations
/// must make that cycle atomic with respect to other writers.
pub trait FavoritesStore: Send + Sync {
    /// Read the whole document; a missing document is empty
    fn load_all(&self) -> Result<FavoritesDocument>;

    /// A user's favorites, empty when the user has none
    fn load_for_user(&self, user_id: UserId) -> Result<Vec<FavoriteBook>> {
        Ok(self.load_all()?.favorites(user_id).to_vec())
    }

    /// A user's favorites restricted to one category
    fn load_for_user_in_category(
        &self,
        user_id: UserId,
        category: &str,
    ) -> Result<Vec<FavoriteBook>> {
        Ok(self
            .load_for_user(user_id)?
            .into_iter()
            .filter(|book| book.category == category)
            .collect())
    }

    /// Append a book to the user's list
    fn add_favorite(&self, user_id: UserId, book: FavoriteBook) -> Result<MutationOutcome>;

    /// Drop every book whose isbn is in `isbns`, returning how many went
    fn remove_favorites(&self, user_id: UserId, isbns: &HashSet<String>) -> Result<usize>;

    /// Set the current page of one book
    fn update_favorite_page(&self, user_id: UserId, isbn: &str, page: u32)
        -> Result<MutationOutcome>;

    /// Set the learning notes of one book
    fn save_favorite_learning(&self, user_id: UserId, isbn: &str, text: &str)
        -> Result<MutationOutcome>;
}
