//! Bookmarks command - reading progress across favorites

use anyhow::Result;
use colored::Colorize;
use shelf_core::FavoritesStore;

use super::{get_context, require_session};
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let session = require_session(&ctx)?;
    let books = ctx.favorites.load_for_user(session.user_id)?;

    if json {
        let rows: Vec<_> = books
            .iter()
            .map(|b| serde_json::json!({"isbn": b.isbn, "title": b.title, "current_page": b.current_page}))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("No favorites to bookmark yet.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["ISBN", "Title", "Page"]);
    for book in &books {
        let page = if book.current_page == 0 {
            "not started".dimmed().to_string()
        } else {
            book.current_page.to_string()
        };
        table.add_row(vec![book.isbn.clone(), book.title.clone(), page]);
    }
    println!("{}", table);
    Ok(())
}
