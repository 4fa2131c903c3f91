//! Session service - login state for the command line
//!
//! The logged-in user is kept in `session.json` in the data directory.
//! Handlers read the user id from here instead of a web session cookie.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::domain::Session;
use crate::ports::CredentialStore;

pub const SESSION_FILENAME: &str = "session.json";

/// Manages the current session file
pub struct SessionService {
    users: Arc<dyn CredentialStore>,
    path: PathBuf,
}

impl SessionService {
    pub fn new(users: Arc<dyn CredentialStore>, data_dir: &Path) -> Self {
        Self {
            users,
            path: data_dir.join(SESSION_FILENAME),
        }
    }

    /// Authenticate and start a session
    ///
    /// Returns `None` on a wrong password or unknown user; any existing
    /// session is left as it was.
    pub fn login(&self, username: &str, password: &str) -> Result<Option<Session>> {
        let Some(user) = self.users.authenticate(username, password)? else {
            return Ok(None);
        };

        let session = Session::start(&user);
        self.write(&session)?;
        Ok(Some(session))
    }

    /// End the current session; returns whether one existed
    pub fn logout(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// The current session, if any
    pub fn current(&self) -> Result<Option<Session>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map(Some).map_err(|e| {
            Error::storage(format!(
                "Session file {} is corrupt ({}); run `shelf logout`",
                self.path.display(),
                e
            ))
        })
    }

    /// The current session, or a NotFound error telling the user to log in
    pub fn require(&self) -> Result<Session> {
        self.current()?
            .ok_or_else(|| Error::not_found("no active session; run `shelf login` first"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, session: &Session) -> Result<()> {
        let dir = self.path.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(dir)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut temp, session)?;
        temp.write_all(b"\n")?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path)
            .map_err(|e| Error::storage(format!("Failed to write session: {}", e.error)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::duckdb::DuckDbUserStore;
    use crate::domain::Argon2Params;
    use tempfile::tempdir;

    fn users() -> Arc<DuckDbUserStore> {
        let store = DuckDbUserStore::open_in_memory()
            .unwrap()
            .with_hash_params(Argon2Params::minimal());
        store.ensure_schema().unwrap();
        Arc::new(store)
    }

    #[test]
    fn test_login_writes_session() {
        let dir = tempdir().unwrap();
        let users = users();
        let id = users.register("ada", "pw").unwrap();
        let service = SessionService::new(users, dir.path());

        let session = service.login("ada", "pw").unwrap().unwrap();
        assert_eq!(session.user_id, id);
        assert_eq!(service.current().unwrap(), Some(session));
    }

    #[test]
    fn test_failed_login_keeps_existing_session() {
        let dir = tempdir().unwrap();
        let users = users();
        users.register("ada", "pw").unwrap();
        let service = SessionService::new(users, dir.path());

        let session = service.login("ada", "pw").unwrap().unwrap();
        assert!(service.login("ada", "nope").unwrap().is_none());
        assert!(service.login("ghost", "pw").unwrap().is_none());
        assert_eq!(service.current().unwrap(), Some(session));
    }

    #[test]
    fn test_logout() {
        let dir = tempdir().unwrap();
        let users = users();
        users.register("ada", "pw").unwrap();
        let service = SessionService::new(users, dir.path());

        assert!(!service.logout().unwrap());
        service.login("ada", "pw").unwrap();
        assert!(service.logout().unwrap());
        assert!(service.current().unwrap().is_none());
        assert!(matches!(service.require(), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_corrupt_session_is_storage_error() {
        let dir = tempdir().unwrap();
        let service = SessionService::new(users(), dir.path());
        fs::write(service.path(), "garbage").unwrap();

        assert!(matches!(service.current(), Err(Error::Storage(_))));
        assert!(service.logout().unwrap());
    }
}
