//! Learnings command - notes saved against favorites

use anyhow::Result;
use colored::Colorize;
use shelf_core::FavoritesStore;

use super::{get_context, require_session};
use crate::output;

pub fn run(full: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = require_session(&ctx)?;
    let books = ctx.favorites.load_for_user(session.user_id)?;

    if json {
        let rows: Vec<_> = books
            .iter()
            .map(|b| serde_json::json!({"isbn": b.isbn, "title": b.title, "learning": b.learning}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("No favorites yet.");
        return Ok(());
    }

    if full {
        for book in &books {
            println!("{} {}", book.title.bold(), format!("({})", book.isbn).dimmed());
            if book.learning.is_empty() {
                println!("  {}", "no notes".dimmed());
            } else {
                for line in book.learning.lines() {
                    println!("  {}", line);
                }
            }
            println!();
        }
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ISBN", "Title", "Notes"]);
    for book in &books {
        table.add_row(vec![
            book.isbn.clone(),
            book.title.clone(),
            output::truncate(&book.learning, 60),
        ]);
    }
    println!("{}", table);
    Ok(())
}
