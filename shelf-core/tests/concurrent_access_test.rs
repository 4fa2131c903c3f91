//! Concurrent favorites access tests
//!
//! Every mutation rewrites the whole favorites document, so two writers that
//! both read before either writes would lose one update. These tests hammer
//! the store from many threads, through shared and separate store
//! instances, and check that every write survives.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

use tempfile::TempDir;

use shelf_core::adapters::json_favorites::JsonFavoritesStore;
use shelf_core::{FavoriteBook, FavoritesStore, MutationOutcome, UserId};

/// Number of concurrent threads for stress tests
const THREAD_COUNT: usize = 8;

/// Number of iterations per thread
const ITERATIONS_PER_THREAD: usize = 10;

fn create_test_book(thread_id: usize, i: usize) -> FavoriteBook {
    FavoriteBook::new(
        format!("isbn-{}-{}", thread_id, i),
        format!("Book {} by thread {}", i, thread_id),
        "Concurrent Author",
        "2024",
        Some("stress"),
    )
}

/// Threads sharing one store, each adding for its own user
#[test]
fn test_shared_store_distinct_users() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFavoritesStore::in_dir(temp_dir.path()));
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let user = UserId::new(thread_id as i64 + 1);
                for i in 0..ITERATIONS_PER_THREAD {
                    let outcome = store
                        .add_favorite(user, create_test_book(thread_id, i))
                        .unwrap();
                    assert_eq!(outcome, MutationOutcome::Applied);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let document = store.load_all().unwrap();
    assert_eq!(document.user_count(), THREAD_COUNT);
    assert_eq!(document.favorite_count(), THREAD_COUNT * ITERATIONS_PER_THREAD);
}

/// Separate store instances on the same file only share the file lock
///
/// This is the situation of two shelf processes running at once.
#[test]
fn test_separate_instances_lose_no_updates() {
    let temp_dir = TempDir::new().unwrap();
    let dir = Arc::new(temp_dir.path().to_path_buf());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let start = Instant::now();

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let dir = Arc::clone(&dir);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let store = JsonFavoritesStore::in_dir(&dir);
                barrier.wait();
                let user = UserId::new(thread_id as i64 + 1);
                for i in 0..ITERATIONS_PER_THREAD {
                    store
                        .add_favorite(user, create_test_book(thread_id, i))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    println!(
        "{} writes through {} instances in {:?}",
        THREAD_COUNT * ITERATIONS_PER_THREAD,
        THREAD_COUNT,
        start.elapsed()
    );

    let document = JsonFavoritesStore::in_dir(&dir).load_all().unwrap();
    for thread_id in 0..THREAD_COUNT {
        let favorites = document.favorites(UserId::new(thread_id as i64 + 1));
        assert_eq!(
            favorites.len(),
            ITERATIONS_PER_THREAD,
            "thread {} lost updates",
            thread_id
        );
    }
}

/// Many threads mutating the same user's list
#[test]
fn test_same_user_mixed_mutations() {
    let temp_dir = TempDir::new().unwrap();
    let user = UserId::new(42);

    // Seed one book per thread so page updates have a target
    {
        let store = JsonFavoritesStore::in_dir(temp_dir.path());
        for thread_id in 0..THREAD_COUNT {
            store.add_favorite(user, create_test_book(thread_id, 0)).unwrap();
        }
    }

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let dir = Arc::new(temp_dir.path().to_path_buf());

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let dir = Arc::clone(&dir);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let store = JsonFavoritesStore::in_dir(&dir);
                let seeded = format!("isbn-{}-0", thread_id);
                barrier.wait();
                for i in 1..ITERATIONS_PER_THREAD {
                    store
                        .add_favorite(user, create_test_book(thread_id, i))
                        .unwrap();
                    store
                        .update_favorite_page(user, &seeded, i as u32)
                        .unwrap();
                }
                store
                    .save_favorite_learning(user, &seeded, &format!("thread {}", thread_id))
                    .unwrap();
                // Drop half of what was added
                let to_remove: HashSet<String> = (1..ITERATIONS_PER_THREAD)
                    .filter(|i| i % 2 == 0)
                    .map(|i| format!("isbn-{}-{}", thread_id, i))
                    .collect();
                store.remove_favorites(user, &to_remove).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let favorites = JsonFavoritesStore::in_dir(&dir).load_for_user(user).unwrap();
    let removed_per_thread = (1..ITERATIONS_PER_THREAD).filter(|i| i % 2 == 0).count();
    assert_eq!(
        favorites.len(),
        THREAD_COUNT * (ITERATIONS_PER_THREAD - removed_per_thread)
    );

    for thread_id in 0..THREAD_COUNT {
        let seeded = format!("isbn-{}-0", thread_id);
        let book = favorites.iter().find(|b| b.isbn == seeded).unwrap();
        assert_eq!(book.current_page, (ITERATIONS_PER_THREAD - 1) as u32);
        assert_eq!(book.learning, format!("thread {}", thread_id));
    }
}

/// Readers running alongside writers always see a whole document
#[test]
fn test_readers_never_see_partial_document() {
    let temp_dir = TempDir::new().unwrap();
    let dir = Arc::new(temp_dir.path().to_path_buf());
    let user = UserId::new(1);

    let writer = {
        let dir = Arc::clone(&dir);
        thread::spawn(move || {
            let store = JsonFavoritesStore::in_dir(&dir);
            for i in 0..50 {
                store.add_favorite(user, create_test_book(0, i)).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let dir = Arc::clone(&dir);
            thread::spawn(move || {
                let store = JsonFavoritesStore::in_dir(&dir);
                let mut last_seen = 0;
                for _ in 0..100 {
                    let count = store.load_for_user(user).unwrap().len();
                    assert!(count >= last_seen, "document went backwards");
                    last_seen = count;
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    let store = JsonFavoritesStore::in_dir(&dir);
    assert_eq!(store.load_for_user(user).unwrap().len(), 50);
}
