//! JSON favorites store
//!
//! All users' favorites live in one `favorites.json` document. Every
//! mutation loads the whole document, changes one user's list and writes the
//! whole document back.
//!
//! Writers are serialized twice over: an in-process mutex guards the
//! load-mutate-persist cycle, and an exclusive advisory lock on a sidecar
//! `.lock` file keeps other processes (and other store instances pointing at
//! the same file) out while the cycle runs. The document is replaced by
//! rename, so readers never observe a half-written file and need no lock.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::domain::{FavoriteBook, FavoritesDocument, MutationOutcome, UserId};
use crate::ports::FavoritesStore;

/// Default document file name inside the data directory
pub const FAVORITES_FILENAME: &str = "favorites.json";

/// Favorites store backed by a single JSON document
pub struct JsonFavoritesStore {
    path: PathBuf,
    lock_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFavoritesStore {
    /// Create a store for the document at `path`
    ///
    /// Nothing is created on disk until the first mutation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut lock_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| FAVORITES_FILENAME.into());
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);

        Self {
            path,
            lock_path,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store for `favorites.json` inside a data directory
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(FAVORITES_FILENAME))
    }

    /// Path of the favorites document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<FavoritesDocument> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FavoritesDocument::new()),
            Err(e) => {
                return Err(Error::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        // An empty file is what an interrupted first write would leave behind
        // on filesystems without atomic rename; treat it like a missing file.
        if content.trim().is_empty() {
            return Ok(FavoritesDocument::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            Error::storage(format!(
                "Favorites document {} is corrupt: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Write the document to a temp file next to it, then rename over it
    fn write_document(&self, document: &FavoritesDocument) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let temp = NamedTempFile::new_in(dir).map_err(|e| {
            Error::storage(format!("Failed to create temp file in {}: {}", dir.display(), e))
        })?;

        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, document)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(&self.path).map_err(|e| {
            Error::storage(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e.error
            ))
        })?;

        Ok(())
    }

    fn acquire_file_lock(&self) -> Result<File> {
        if let Some(parent) = self.lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|e| {
                Error::storage(format!(
                    "Failed to open lock file {}: {}",
                    self.lock_path.display(),
                    e
                ))
            })?;
        file.lock_exclusive()
            .map_err(|e| Error::storage(format!("Failed to lock favorites document: {}", e)))?;
        Ok(file)
    }

    /// Run one load-mutate-persist cycle under both locks
    ///
    /// The closure returns the value to hand back and whether the document
    /// changed; unchanged documents are not rewritten.
    fn mutate<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut FavoritesDocument) -> Result<(T, bool)>,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        let lock_file = self.acquire_file_lock()?;

        let result = self.read_document().and_then(|mut document| {
            let (value, changed) = f(&mut document)?;
            if changed {
                self.write_document(&document)?;
            }
            Ok(value)
        });

        // Closing the file releases the lock too; unlock explicitly so the
        // release does not depend on drop order.
        let _ = FileExt::unlock(&lock_file);
        result
    }
}

impl FavoritesStore for JsonFavoritesStore {
    fn load_all(&self) -> Result<FavoritesDocument> {
        self.read_document()
    }

    fn add_favorite(&self, user_id: UserId, book: FavoriteBook) -> Result<MutationOutcome> {
        book.validate()?;

        self.mutate(|document| {
            let favorites = document.favorites_mut(user_id);
            if favorites.iter().any(|existing| existing.isbn == book.isbn) {
                return Ok((MutationOutcome::Duplicate, false));
            }
            favorites.push(book);
            Ok((MutationOutcome::Applied, true))
        })
    }

    fn remove_favorites(&self, user_id: UserId, isbns: &HashSet<String>) -> Result<usize> {
        if isbns.is_empty() {
            return Ok(0);
        }

        self.mutate(|document| {
            let Some(favorites) = document.existing_favorites_mut(user_id) else {
                return Ok((0, false));
            };
            let before = favorites.len();
            favorites.retain(|book| !isbns.contains(&book.isbn));
            let removed = before - favorites.len();
            Ok((removed, removed > 0))
        })
    }

    fn update_favorite_page(
        &self,
        user_id: UserId,
        isbn: &str,
        page: u32,
    ) -> Result<MutationOutcome> {
        self.mutate(|document| {
            let book = document
                .existing_favorites_mut(user_id)
                .and_then(|favorites| favorites.iter_mut().find(|b| b.isbn == isbn));
            match book {
                Some(book) => {
                    book.current_page = page;
                    Ok((MutationOutcome::Applied, true))
                }
                None => Ok((MutationOutcome::NotFound, false)),
            }
        })
    }

    fn save_favorite_learning(
        &self,
        user_id: UserId,
        isbn: &str,
        text: &str,
    ) -> Result<MutationOutcome> {
        self.mutate(|document| {
            let book = document
                .existing_favorites_mut(user_id)
                .and_then(|favorites| favorites.iter_mut().find(|b| b.isbn == isbn));
            match book {
                Some(book) => {
                    book.learning = text.to_string();
                    Ok((MutationOutcome::Applied, true))
                }
                None => Ok((MutationOutcome::NotFound, false)),
            }
        })
    }
}
