//! DuckDB credential store
//!
//! Users live in the `users` table of `shelf.duckdb`. Passwords are stored
//! as Argon2id PHC strings.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use duckdb::{params, Connection, Params, Row};

use crate::domain::result::{Error, Result};
use crate::domain::{Argon2Params, PasswordDigest, User, UserId};
use crate::migrations::MIGRATIONS;
use crate::ports::CredentialStore;
use crate::services::{MigrationResult, MigrationService};

/// Default database file name inside the data directory
pub const DB_FILENAME: &str = "shelf.duckdb";

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
pub(crate) fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

fn is_unique_violation(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("duplicate key") || lower.contains("unique constraint")
}

/// DuckDB-backed credential store
pub struct DuckDbUserStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    hash_params: Argon2Params,
}

impl DuckDbUserStore {
    /// Open (or create) the users database
    ///
    /// Retries with exponential backoff on file locking errors, which occur
    /// when another process holds the database open.
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                        hash_params: Argon2Params::default(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[shelf] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("Failed to open database after {} retries", MAX_RETRIES)))
    }

    /// In-memory store, for tests and throwaway sessions
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
            hash_params: Argon2Params::default(),
        })
    }

    /// Use different Argon2 parameters for newly registered users
    ///
    /// Existing users keep verifying against the parameters stored with them.
    pub fn with_hash_params(mut self, params: Argon2Params) -> Self {
        self.hash_params = params;
        self
    }

    fn try_open_connection(db_path: &Path) -> anyhow::Result<Connection> {
        // Extension autoloading stays off; nothing here needs extensions
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        Ok(conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    /// Run database migrations
    pub fn run_migrations(&self) -> anyhow::Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn, MIGRATIONS).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> anyhow::Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    /// Path of the database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn row_to_user(row: &Row<'_>) -> duckdb::Result<User> {
        let id: i64 = row.get(0)?;
        let username: String = row.get(1)?;
        let created_str: String = row.get(2)?;

        Ok(User {
            id: UserId::new(id),
            username,
            created_at: parse_timestamp(&created_str),
        })
    }
}

/// First row of a query, or `None` when it matched nothing
fn first_row<T, P, F>(conn: &Connection, sql: &str, params: P, f: F) -> duckdb::Result<Option<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> duckdb::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query_map(params, f)?;
    rows.next().transpose()
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn validate_credentials(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(Error::validation("username cannot be empty"));
    }
    if password.is_empty() {
        return Err(Error::validation("password cannot be empty"));
    }
    Ok(())
}

impl CredentialStore for DuckDbUserStore {
    fn register(&self, username: &str, password: &str) -> Result<UserId> {
        validate_credentials(username, password)?;
        let username = username.trim();

        // Hash before taking the connection lock; derivation is the slow part
        let digest = PasswordDigest::create(password, self.hash_params)?;

        let conn = self.lock()?;

        let existing: Option<i64> = first_row(
            &conn,
            "SELECT id FROM users WHERE username = ?",
            [username],
            |row| row.get(0),
        )?;
        if existing.is_some() {
            return Err(Error::Conflict(format!(
                "username '{}' is already taken",
                username
            )));
        }

        let id: i64 = conn
            .query_row(
                "INSERT INTO users (username, password, created_at)
                 VALUES (?, ?, ?)
                 RETURNING id",
                params![username, digest.as_phc(), Utc::now().to_rfc3339()],
                |row| row.get(0),
            )
            .map_err(|e| {
                let msg = e.to_string();
                if is_unique_violation(&msg) {
                    Error::Conflict(format!("username '{}' is already taken", username))
                } else {
                    Error::database(msg)
                }
            })?;

        Ok(UserId::new(id))
    }

    fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let row = {
            let conn = self.lock()?;
            first_row(
                &conn,
                "SELECT id, username, created_at, password
                 FROM users WHERE username = ?",
                [username.trim()],
                |row| Ok((Self::row_to_user(row)?, row.get::<_, String>(3)?)),
            )?
        };

        let Some((user, phc)) = row else {
            return Ok(None);
        };

        if PasswordDigest::from_phc(phc).verify(password)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let conn = self.lock()?;
        let user = first_row(
            &conn,
            "SELECT id, username, created_at FROM users WHERE id = ?",
            [id.value()],
            Self::row_to_user,
        )?;
        Ok(user)
    }

    fn count_users(&self) -> Result<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}
