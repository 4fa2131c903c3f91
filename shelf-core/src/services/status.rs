//! Status service - library summary

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::ports::{CredentialStore, FavoritesStore};
use crate::services::SessionService;

pub struct StatusService {
    users: Arc<dyn CredentialStore>,
    favorites: Arc<dyn FavoritesStore>,
    favorites_path: PathBuf,
}

impl StatusService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        favorites: Arc<dyn FavoritesStore>,
        favorites_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            users,
            favorites,
            favorites_path: favorites_path.into(),
        }
    }

    /// Get overall status summary
    pub fn get_status(&self, sessions: &SessionService) -> Result<StatusSummary> {
        let document = self.favorites.load_all()?;
        let session = sessions.current()?;

        let my_favorites = match &session {
            Some(s) => Some(document.favorites(s.user_id).len()),
            None => None,
        };

        Ok(StatusSummary {
            total_users: self.users.count_users()?,
            users_with_favorites: document
                .iter()
                .filter(|(_, books)| !books.is_empty())
                .count(),
            total_favorites: document.favorite_count(),
            favorites_path: self.favorites_path.display().to_string(),
            logged_in_as: session.map(|s| s.username),
            my_favorites,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_users: u64,
    pub users_with_favorites: usize,
    pub total_favorites: usize,
    pub favorites_path: String,
    pub logged_in_as: Option<String>,
    pub my_favorites: Option<usize>,
}
