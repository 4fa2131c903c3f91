//! Login session model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{User, UserId};

/// The logged-in user, persisted in session.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: Uuid,
    pub user_id: UserId,
    pub username: String,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    /// Start a new session for an authenticated user
    pub fn start(user: &User) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user_id: user.id,
            username: user.username.clone(),
            logged_in_at: Utc::now(),
        }
    }
}
