//! Search command - query the book catalog

use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use shelf_core::services::LogEvent;
use shelf_core::{Error, FavoriteBook, FavoritesStore, MutationOutcome};

use super::{get_context, get_logger, log_event, require_session};
use crate::output;

pub fn run(category: &str, topic: Option<&str>, add: Vec<usize>, json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;
    // Check the session before spending a catalog call on it
    let session = if add.is_empty() {
        None
    } else {
        Some(require_session(&ctx)?)
    };

    let spinner = (!json).then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Searching {}...", ctx.search_service.provider_name()));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let result = ctx.search_service.search(category, topic.unwrap_or(""));

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    let books = match result {
        Ok(books) => {
            log_event(
                &logger,
                LogEvent::new("search_completed").with_component("catalog"),
            );
            books
        }
        Err(e) => {
            if let Error::Catalog(catalog_error) = &e {
                log_event(
                    &logger,
                    LogEvent::new("search_failed")
                        .with_component("catalog")
                        .with_error(catalog_error.category()),
                );
            }
            return Err(e.into());
        }
    };

    if let Some(session) = session {
        let mut added = Vec::new();
        for index in add {
            let Some(summary) = index.checked_sub(1).and_then(|i| books.get(i)) else {
                output::warning(&format!("No result #{} (got {} results)", index, books.len()));
                continue;
            };
            let outcome = ctx
                .favorites
                .add_favorite(session.user_id, FavoriteBook::from(summary.clone()))?;
            match outcome {
                MutationOutcome::Applied => added.push(summary.isbn.clone()),
                MutationOutcome::Duplicate => output::warning(&format!(
                    "'{}' is already in your favorites",
                    summary.title
                )),
                MutationOutcome::NotFound => {}
            }
        }
        if !added.is_empty() {
            log_event(
                &logger,
                LogEvent::new("favorite_added")
                    .with_component("favorites")
                    .with_command("search"),
            );
        }
        if json {
            println!(
                "{}",
                serde_json::json!({"results": books, "added": added})
            );
        } else {
            println!("{}", output::search_table(&books));
            output::success(&format!("Added {} book(s) to favorites", added.len()));
        }
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("No books found for {}.", category.bold());
        return Ok(());
    }

    println!("{}", output::search_table(&books));
    println!(
        "{}",
        "Add results with `shelf search <category> --add 1,2`".dimmed()
    );
    Ok(())
}
