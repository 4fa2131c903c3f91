//! Favorites commands - list, add, remove and track reading progress

use std::collections::HashSet;

use anyhow::Result;
use clap::Subcommand;
use dialoguer::Input;
use shelf_core::services::LogEvent;
use shelf_core::{parse_page, FavoriteBook, FavoritesStore, MutationOutcome};

use super::{get_context, get_logger, log_event, read_stdin_list, require_session};
use crate::output;

#[derive(Subcommand)]
pub enum FavoritesCommands {
    /// List your favorites
    List {
        /// Only show books in this category
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a book by hand
    Add {
        #[arg(long)]
        isbn: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        /// Publication year
        #[arg(long)]
        year: String,
        /// Category (defaults to "Uncategorized")
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove books by ISBN (reads ISBNs from stdin when none are given)
    Remove {
        /// ISBNs to remove
        isbns: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record the page you are on
    Page {
        isbn: String,
        /// Page number (non-negative integer)
        page: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save what you learned from a book
    Learn {
        isbn: String,
        /// Notes text (prompted for when omitted)
        text: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: FavoritesCommands) -> Result<()> {
    match command {
        FavoritesCommands::List { category, json } => list(category.as_deref(), json),
        FavoritesCommands::Add {
            isbn,
            title,
            author,
            year,
            category,
            json,
        } => add(
            FavoriteBook::new(isbn, title, author, year, category.as_deref()),
            json,
        ),
        FavoritesCommands::Remove { isbns, json } => remove(isbns, json),
        FavoritesCommands::Page { isbn, page, json } => update_page(&isbn, &page, json),
        FavoritesCommands::Learn { isbn, text, json } => learn(&isbn, text, json),
    }
}

fn list(category: Option<&str>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = require_session(&ctx)?;

    let books = match category {
        Some(c) => ctx.favorites.load_for_user_in_category(session.user_id, c)?,
        None => ctx.favorites.load_for_user(session.user_id)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("No favorites yet. Find some with `shelf search <category>`.");
        return Ok(());
    }

    println!("{}", output::favorites_table(&books));
    Ok(())
}

fn add(book: FavoriteBook, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    let session = require_session(&ctx)?;

    let title = book.title.clone();
    let outcome = ctx.favorites.add_favorite(session.user_id, book)?;

    if outcome.is_applied() {
        log_event(
            &logger,
            LogEvent::new("favorite_added")
                .with_component("favorites")
                .with_command("favorites add"),
        );
    }
    report(outcome, json, &format!("Added '{}' to favorites", title))
}

fn remove(isbns: Vec<String>, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    let session = require_session(&ctx)?;

    let isbns: HashSet<String> = if isbns.is_empty() {
        read_stdin_list()?.into_iter().collect()
    } else {
        isbns.into_iter().map(|s| s.trim().to_string()).collect()
    };
    if isbns.is_empty() {
        anyhow::bail!("No ISBNs given");
    }

    let removed = ctx.favorites.remove_favorites(session.user_id, &isbns)?;
    if removed > 0 {
        log_event(
            &logger,
            LogEvent::new("favorites_removed")
                .with_component("favorites")
                .with_command("favorites remove"),
        );
    }

    if json {
        println!("{}", serde_json::json!({"removed": removed}));
    } else if removed == 0 {
        output::warning("None of those books are in your favorites");
    } else {
        output::success(&format!("Removed {} book(s)", removed));
    }
    Ok(())
}

fn update_page(isbn: &str, page: &str, json: bool) -> Result<()> {
    let page = parse_page(page)?;
    let ctx = get_context()?;
    let session = require_session(&ctx)?;

    let outcome = ctx
        .favorites
        .update_favorite_page(session.user_id, isbn, page)?;
    report(outcome, json, &format!("Bookmarked page {}", page))
}

fn learn(isbn: &str, text: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = require_session(&ctx)?;

    let text = match text {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("What did you learn?")
            .allow_empty(true)
            .interact_text()?,
    };

    let outcome = ctx
        .favorites
        .save_favorite_learning(session.user_id, isbn, &text)?;
    report(outcome, json, "Saved your notes")
}

/// Print a mutation outcome; anything but Applied fails the command
fn report(outcome: MutationOutcome, json: bool, applied_msg: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::json!({"outcome": outcome}));
    }

    match outcome {
        MutationOutcome::Applied => {
            if !json {
                output::success(applied_msg);
            }
            Ok(())
        }
        MutationOutcome::NotFound => {
            if !json {
                output::warning("That book is not in your favorites");
            }
            std::process::exit(1);
        }
        MutationOutcome::Duplicate => {
            if !json {
                output::warning("That book is already in your favorites");
            }
            std::process::exit(1);
        }
    }
}
